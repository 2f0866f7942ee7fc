//! Runs, required actions and run-step deltas

use serde::{Deserialize, Serialize};

use super::tools::RequiredActionFunctionToolCall;

/// Run status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Incomplete,
    Expired,
    #[serde(other)]
    Unknown,
}

/// Run object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    /// Run id
    pub id: String,
    /// Thread the run belongs to
    #[serde(default)]
    pub thread_id: Option<String>,
    /// Assistant executing the run
    #[serde(default)]
    pub assistant_id: Option<String>,
    /// Current status
    pub status: RunStatus,
    /// Set while the run waits for tool outputs
    #[serde(default)]
    pub required_action: Option<RequiredAction>,
    /// Failure details
    #[serde(default)]
    pub last_error: Option<RunError>,
}

impl Run {
    /// Function calls the client has to answer, empty when nothing is required.
    pub fn pending_tool_calls(&self) -> &[RequiredActionFunctionToolCall] {
        self.required_action
            .as_ref()
            .map(|action| action.submit_tool_outputs.tool_calls.as_slice())
            .unwrap_or_default()
    }
}

/// Action a paused run waits for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequiredAction {
    /// Always `submit_tool_outputs`
    pub r#type: String,
    /// Tool calls to answer
    pub submit_tool_outputs: SubmitToolOutputsAction,
}

/// Tool calls of a `submit_tool_outputs` action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitToolOutputsAction {
    /// Calls to execute
    pub tool_calls: Vec<RequiredActionFunctionToolCall>,
}

/// Error attached to a failed run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunError {
    pub code: String,
    pub message: String,
}

/// Run step object (lifecycle events only carry what we log)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStep {
    /// Step id
    pub id: String,
    /// Run the step belongs to
    #[serde(default)]
    pub run_id: Option<String>,
    /// `message_creation` or `tool_calls`
    #[serde(default)]
    pub r#type: Option<String>,
}

/// Payload of `thread.run.step.delta`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStepDeltaEvent {
    /// Step id
    pub id: String,
    /// Changed fields
    pub delta: RunStepDelta,
}

/// Changed fields of a run step
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RunStepDelta {
    #[serde(default)]
    pub step_details: Option<RunStepDeltaDetails>,
}

/// Step details delta
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunStepDeltaDetails {
    /// Tool calls made during the step
    ToolCalls {
        #[serde(default)]
        tool_calls: Vec<ToolCallDelta>,
    },
    /// Message created by the step
    MessageCreation {
        #[serde(default)]
        message_creation: Option<serde_json::Value>,
    },
    #[serde(other)]
    Other,
}

/// Incremental tool call of a run step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolCallDelta {
    /// Code interpreter invocation
    CodeInterpreter {
        index: usize,
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        code_interpreter: Option<CodeInterpreterDelta>,
    },
    /// File search invocation
    FileSearch {
        index: usize,
        #[serde(default)]
        id: Option<String>,
    },
    /// Function invocation
    Function {
        index: usize,
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        function: Option<FunctionDelta>,
    },
    /// Tool types this crate does not know
    #[serde(other)]
    Other,
}

impl ToolCallDelta {
    /// Position of the call within the step; `None` for unknown tools
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::CodeInterpreter { index, .. }
            | Self::FileSearch { index, .. }
            | Self::Function { index, .. } => Some(*index),
            Self::Other => None,
        }
    }

    /// Kind of tool
    pub fn kind(&self) -> Option<ToolCallKind> {
        match self {
            Self::CodeInterpreter { .. } => Some(ToolCallKind::CodeInterpreter),
            Self::FileSearch { .. } => Some(ToolCallKind::FileSearch),
            Self::Function { .. } => Some(ToolCallKind::Function),
            Self::Other => None,
        }
    }

    /// Code input carried by this delta, if any
    pub fn code_input(&self) -> Option<&str> {
        match self {
            Self::CodeInterpreter {
                code_interpreter: Some(ci),
                ..
            } => ci.input.as_deref(),
            _ => None,
        }
    }
}

/// Kind of a run-step tool call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolCallKind {
    CodeInterpreter,
    FileSearch,
    Function,
}

/// Code interpreter delta
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CodeInterpreterDelta {
    /// Code input fragment
    #[serde(default)]
    pub input: Option<String>,
    /// Outputs (logs or images), kept raw
    #[serde(default)]
    pub outputs: Option<Vec<serde_json::Value>>,
}

/// Function call delta inside a run step
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FunctionDelta {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub arguments: Option<String>,
    #[serde(default)]
    pub output: Option<String>,
}
