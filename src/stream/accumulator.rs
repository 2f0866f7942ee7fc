//! Helper events derived from raw platform events
//!
//! The platform only sends deltas. A chat view also needs to know when a new
//! text part or a new tool call *starts*, so the accumulator remembers which
//! parts it has already seen and emits the "created" events itself.

use std::collections::HashSet;

use futures_util::{Stream, StreamExt};

use super::decoder::EventStream;
use crate::error::Result;
use crate::types::{
    Annotation, AssistantStreamEvent, MessageContentDelta, Run, RunStepDeltaDetails, ToolCallKind,
};

/// Event consumed by the [dispatcher](super::dispatcher).
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A new assistant text part started
    TextCreated,
    /// Text fragment, possibly with annotations of the text so far
    TextDelta {
        value: Option<String>,
        annotations: Vec<Annotation>,
    },
    /// An image file was attached to the message
    ImageFileDone { file_id: String },
    /// A new tool call started
    ToolCallCreated { kind: ToolCallKind },
    /// Tool call fragment; `input` is the code-interpreter input, if any
    ToolCallDelta {
        kind: ToolCallKind,
        input: Option<String>,
    },
    /// The run paused for function outputs
    RunRequiresAction(Run),
    /// The run finished
    RunCompleted(Run),
    /// The run ended without completing (failed, cancelled, expired, incomplete)
    RunStopped(Run),
}

/// Tracks which content parts and tool calls have already been announced.
#[derive(Debug, Default)]
pub struct HelperAccumulator {
    text_parts: HashSet<(String, usize)>,
    image_parts: HashSet<(String, usize)>,
    tool_calls: HashSet<(String, usize)>,
}

impl HelperAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate one platform event. Most lifecycle events produce nothing.
    pub fn push(&mut self, event: AssistantStreamEvent) -> Vec<StreamEvent> {
        let mut out = Vec::new();
        match event {
            AssistantStreamEvent::MessageDelta(delta) => {
                for part in delta.delta.content {
                    let Some(index) = part.index() else {
                        continue;
                    };
                    let key = (delta.id.clone(), index);
                    match part {
                        MessageContentDelta::Text { text, .. } => {
                            if self.text_parts.insert(key) {
                                out.push(StreamEvent::TextCreated);
                            }
                            if let Some(text) = text {
                                out.push(StreamEvent::TextDelta {
                                    value: text.value,
                                    annotations: text.annotations.unwrap_or_default(),
                                });
                            }
                        }
                        MessageContentDelta::ImageFile {
                            image_file: Some(image),
                            ..
                        } => {
                            if let Some(file_id) = image.file_id
                                && self.image_parts.insert(key)
                            {
                                out.push(StreamEvent::ImageFileDone { file_id });
                            }
                        }
                        _ => {}
                    }
                }
            }
            AssistantStreamEvent::RunStepDelta(step) => {
                let Some(RunStepDeltaDetails::ToolCalls { tool_calls }) = step.delta.step_details
                else {
                    return out;
                };
                for call in tool_calls {
                    let (Some(kind), Some(index)) = (call.kind(), call.index()) else {
                        tracing::debug!("ignoring tool call of unknown type");
                        continue;
                    };
                    let input = call.code_input().map(str::to_string);
                    if self.tool_calls.insert((step.id.clone(), index)) {
                        out.push(StreamEvent::ToolCallCreated { kind });
                        if input.as_deref().is_some_and(|s| !s.is_empty()) {
                            out.push(StreamEvent::ToolCallDelta { kind, input });
                        }
                    } else {
                        out.push(StreamEvent::ToolCallDelta { kind, input });
                    }
                }
            }
            AssistantStreamEvent::RunRequiresAction(run) => {
                out.push(StreamEvent::RunRequiresAction(run));
            }
            AssistantStreamEvent::RunCompleted(run) => out.push(StreamEvent::RunCompleted(run)),
            AssistantStreamEvent::RunFailed(run)
            | AssistantStreamEvent::RunCancelled(run)
            | AssistantStreamEvent::RunExpired(run)
            | AssistantStreamEvent::RunIncomplete(run) => {
                tracing::warn!(run_id = %run.id, status = ?run.status, error = ?run.last_error, "run stopped");
                out.push(StreamEvent::RunStopped(run));
            }
            AssistantStreamEvent::Unknown { event, .. } => {
                tracing::debug!(%event, "ignoring unknown stream event");
            }
            _ => {}
        }
        out
    }
}

/// Map a decoded event stream to helper events, preserving order.
pub fn helper_events(events: EventStream) -> impl Stream<Item = Result<StreamEvent>> + Send {
    let mut accumulator = HelperAccumulator::new();
    events.flat_map(move |item| {
        let batch: Vec<Result<StreamEvent>> = match item {
            Ok(event) => accumulator.push(event).into_iter().map(Ok).collect(),
            Err(e) => vec![Err(e)],
        };
        futures_util::stream::iter(batch)
    })
}
