//! Wire types of the assistant platform

pub mod events;
pub mod message;
pub mod relay;
pub mod run;
pub mod thread;
pub mod tools;

pub use events::{AssistantStreamEvent, DONE_MARKER, ErrorEventData};
pub use message::{
    Annotation, FileRef, ImageFileDelta, MessageContentDelta, MessageDelta, MessageDeltaEvent,
    TextDelta, ThreadMessage,
};
pub use relay::{AssistantCreated, ErrorBody, SendMessageBody, SubmitActionsBody, ThreadCreated};
pub use run::{
    CodeInterpreterDelta, FunctionDelta, RequiredAction, Run, RunError, RunStatus, RunStep,
    RunStepDelta, RunStepDeltaDetails, RunStepDeltaEvent, SubmitToolOutputsAction,
    ToolCallDelta, ToolCallKind,
};
pub use thread::{
    Assistant, CreateAssistantRequest, CreateMessageRequest, CreateRunRequest,
    SubmitToolOutputsRequest, Thread, ThreadId,
};
pub use tools::{
    AssistantTool, FunctionCall, FunctionDefinition, RequiredActionFunctionToolCall, ToolOutput,
};
