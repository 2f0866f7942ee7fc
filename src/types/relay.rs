//! JSON bodies exchanged between the chat client and the relay

use serde::{Deserialize, Serialize};

use super::tools::ToolOutput;

/// Response of `POST /api/assistants`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantCreated {
    pub assistant_id: String,
}

/// Response of `POST /api/assistants/threads`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadCreated {
    pub thread_id: String,
}

/// Body of `POST /api/assistants/threads/:threadId/messages`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendMessageBody {
    pub content: String,
}

/// Body of `POST /api/assistants/threads/:threadId/actions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitActionsBody {
    pub run_id: String,
    pub tool_call_outputs: Vec<ToolOutput>,
}

/// Error body returned by the relay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
