//! Stream event dispatcher
//!
//! Applies [`StreamEvent`]s to a [`Transcript`] in arrival order. Function
//! calls are not executed here: a paused run is reported back as
//! [`Dispatch::RequiresAction`] and the caller resumes it.

use super::accumulator::StreamEvent;
use super::annotations::resolve_annotations;
use crate::chat::{Message, Role, Transcript};
use crate::routes::file_link;
use crate::types::{RequiredActionFunctionToolCall, ToolCallKind};

/// Transcript change caused by one event; the payload is the message position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Update {
    /// A new message was appended
    Appended(usize),
    /// Text was appended to an existing message
    Extended(usize),
    /// Markers in an existing message were resolved to file links
    Annotated(usize),
}

impl Update {
    pub fn index(&self) -> usize {
        match self {
            Self::Appended(i) | Self::Extended(i) | Self::Annotated(i) => *i,
        }
    }
}

/// Outcome of dispatching one event
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    Updated(Update),
    /// The event did not change the transcript
    Ignored,
    /// The run waits for the outputs of these calls
    RequiresAction {
        run_id: String,
        tool_calls: Vec<RequiredActionFunctionToolCall>,
    },
    /// The run finished and input is enabled again
    RunCompleted,
}

/// Apply one event to the transcript.
pub fn dispatch(transcript: &mut Transcript, event: StreamEvent) -> Dispatch {
    match event {
        StreamEvent::TextCreated => {
            Dispatch::Updated(Update::Appended(transcript.push(Message::new(Role::Assistant, ""))))
        }
        StreamEvent::TextDelta { value, annotations } => {
            let mut update = None;
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                update = append_to_last(transcript, &value).map(Update::Extended);
            }
            if !annotations.is_empty()
                && let Some(index) =
                    transcript.update_last(|text| resolve_annotations(text, &annotations))
            {
                update = Some(update.unwrap_or(Update::Annotated(index)));
            }
            update.map_or(Dispatch::Ignored, Dispatch::Updated)
        }
        StreamEvent::ImageFileDone { file_id } => {
            let reference = format!("\n![{file_id}]({})\n", file_link(&file_id));
            append_to_last(transcript, &reference)
                .map_or(Dispatch::Ignored, |i| Dispatch::Updated(Update::Extended(i)))
        }
        StreamEvent::ToolCallCreated {
            kind: ToolCallKind::CodeInterpreter,
        } => Dispatch::Updated(Update::Appended(transcript.push(Message::new(Role::Code, "")))),
        StreamEvent::ToolCallDelta {
            kind: ToolCallKind::CodeInterpreter,
            input: Some(input),
        } if !input.is_empty() => append_to_last(transcript, &input)
            .map_or(Dispatch::Ignored, |i| Dispatch::Updated(Update::Extended(i))),
        StreamEvent::ToolCallCreated { .. } | StreamEvent::ToolCallDelta { .. } => Dispatch::Ignored,
        StreamEvent::RunRequiresAction(run) => {
            transcript.set_input_disabled(true);
            let tool_calls = run.pending_tool_calls().to_vec();
            tracing::debug!(run_id = %run.id, calls = tool_calls.len(), "run requires action");
            Dispatch::RequiresAction {
                run_id: run.id,
                tool_calls,
            }
        }
        StreamEvent::RunCompleted(run) => {
            tracing::debug!(run_id = %run.id, "run completed");
            transcript.set_input_disabled(false);
            Dispatch::RunCompleted
        }
        StreamEvent::RunStopped(_) => Dispatch::Ignored,
    }
}

fn append_to_last(transcript: &mut Transcript, text: &str) -> Option<usize> {
    let index = transcript.append_to_last(text);
    if index.is_none() {
        tracing::debug!("dropping delta: transcript has no message to extend");
    }
    index
}
