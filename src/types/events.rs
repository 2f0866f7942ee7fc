//! Typed server-sent events of the assistant platform
//!
//! Every SSE frame carries an event name (`thread.run.created`,
//! `thread.message.delta`, ...) and a JSON payload. [`AssistantStreamEvent::from_sse`]
//! maps the pair onto one variant.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::message::{MessageDeltaEvent, ThreadMessage};
use super::run::{Run, RunStep, RunStepDeltaEvent};
use super::thread::Thread;
use crate::error::{RelayError, Result};

/// Marker payload that ends a stream.
pub const DONE_MARKER: &str = "[DONE]";

/// Payload of an `error` event
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ErrorEventData {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default, rename = "type")]
    pub error_type: Option<String>,
}

/// One decoded stream event.
#[derive(Debug, Clone, PartialEq)]
pub enum AssistantStreamEvent {
    ThreadCreated(Thread),

    RunCreated(Run),
    RunQueued(Run),
    RunInProgress(Run),
    RunRequiresAction(Run),
    RunCompleted(Run),
    RunIncomplete(Run),
    RunFailed(Run),
    RunCancelling(Run),
    RunCancelled(Run),
    RunExpired(Run),

    RunStepCreated(RunStep),
    RunStepInProgress(RunStep),
    RunStepDelta(RunStepDeltaEvent),
    RunStepCompleted(RunStep),
    RunStepFailed(RunStep),
    RunStepCancelled(RunStep),
    RunStepExpired(RunStep),

    MessageCreated(ThreadMessage),
    MessageInProgress(ThreadMessage),
    MessageDelta(MessageDeltaEvent),
    MessageCompleted(ThreadMessage),
    MessageIncomplete(ThreadMessage),

    /// Platform-reported failure
    Error(ErrorEventData),
    /// End of stream
    Done,
    /// Event name this crate does not model
    Unknown { event: String, data: Value },
}

fn parse<T: DeserializeOwned>(event: &str, data: Value) -> Result<T> {
    serde_json::from_value(data)
        .map_err(|e| RelayError::ParseError(format!("Invalid payload for '{event}': {e}")))
}

impl AssistantStreamEvent {
    /// Decode an SSE frame.
    pub fn from_sse(event: &str, data: &str) -> Result<Self> {
        let data = data.trim();
        if event == "done" || data == DONE_MARKER {
            return Ok(Self::Done);
        }

        let payload: Value = serde_json::from_str(data)
            .map_err(|e| RelayError::ParseError(format!("Invalid JSON for '{event}': {e}")))?;

        let decoded = match event {
            "thread.created" => Self::ThreadCreated(parse(event, payload)?),

            "thread.run.created" => Self::RunCreated(parse(event, payload)?),
            "thread.run.queued" => Self::RunQueued(parse(event, payload)?),
            "thread.run.in_progress" => Self::RunInProgress(parse(event, payload)?),
            "thread.run.requires_action" => Self::RunRequiresAction(parse(event, payload)?),
            "thread.run.completed" => Self::RunCompleted(parse(event, payload)?),
            "thread.run.incomplete" => Self::RunIncomplete(parse(event, payload)?),
            "thread.run.failed" => Self::RunFailed(parse(event, payload)?),
            "thread.run.cancelling" => Self::RunCancelling(parse(event, payload)?),
            "thread.run.cancelled" => Self::RunCancelled(parse(event, payload)?),
            "thread.run.expired" => Self::RunExpired(parse(event, payload)?),

            "thread.run.step.created" => Self::RunStepCreated(parse(event, payload)?),
            "thread.run.step.in_progress" => Self::RunStepInProgress(parse(event, payload)?),
            "thread.run.step.delta" => Self::RunStepDelta(parse(event, payload)?),
            "thread.run.step.completed" => Self::RunStepCompleted(parse(event, payload)?),
            "thread.run.step.failed" => Self::RunStepFailed(parse(event, payload)?),
            "thread.run.step.cancelled" => Self::RunStepCancelled(parse(event, payload)?),
            "thread.run.step.expired" => Self::RunStepExpired(parse(event, payload)?),

            "thread.message.created" => Self::MessageCreated(parse(event, payload)?),
            "thread.message.in_progress" => Self::MessageInProgress(parse(event, payload)?),
            "thread.message.delta" => Self::MessageDelta(parse(event, payload)?),
            "thread.message.completed" => Self::MessageCompleted(parse(event, payload)?),
            "thread.message.incomplete" => Self::MessageIncomplete(parse(event, payload)?),

            "error" => Self::Error(parse(event, payload)?),

            other => Self::Unknown {
                event: other.to_string(),
                data: payload,
            },
        };
        Ok(decoded)
    }

    /// Wire name of the event
    pub fn name(&self) -> &str {
        match self {
            Self::ThreadCreated(_) => "thread.created",
            Self::RunCreated(_) => "thread.run.created",
            Self::RunQueued(_) => "thread.run.queued",
            Self::RunInProgress(_) => "thread.run.in_progress",
            Self::RunRequiresAction(_) => "thread.run.requires_action",
            Self::RunCompleted(_) => "thread.run.completed",
            Self::RunIncomplete(_) => "thread.run.incomplete",
            Self::RunFailed(_) => "thread.run.failed",
            Self::RunCancelling(_) => "thread.run.cancelling",
            Self::RunCancelled(_) => "thread.run.cancelled",
            Self::RunExpired(_) => "thread.run.expired",
            Self::RunStepCreated(_) => "thread.run.step.created",
            Self::RunStepInProgress(_) => "thread.run.step.in_progress",
            Self::RunStepDelta(_) => "thread.run.step.delta",
            Self::RunStepCompleted(_) => "thread.run.step.completed",
            Self::RunStepFailed(_) => "thread.run.step.failed",
            Self::RunStepCancelled(_) => "thread.run.step.cancelled",
            Self::RunStepExpired(_) => "thread.run.step.expired",
            Self::MessageCreated(_) => "thread.message.created",
            Self::MessageInProgress(_) => "thread.message.in_progress",
            Self::MessageDelta(_) => "thread.message.delta",
            Self::MessageCompleted(_) => "thread.message.completed",
            Self::MessageIncomplete(_) => "thread.message.incomplete",
            Self::Error(_) => "error",
            Self::Done => "done",
            Self::Unknown { event, .. } => event.as_str(),
        }
    }
}
