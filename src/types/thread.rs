//! Threads, assistants and the request bodies the relay sends upstream

use std::fmt;

use serde::{Deserialize, Serialize};

use super::tools::{AssistantTool, ToolOutput};

/// Opaque handle of a conversation thread.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadId(String);

impl ThreadId {
    /// Wrap a raw id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Raw id
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ThreadId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Thread object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thread {
    /// Thread id
    pub id: ThreadId,
    /// Creation time (unix seconds)
    #[serde(default)]
    pub created_at: Option<i64>,
}

/// Assistant object (only the fields the relay reads)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assistant {
    /// Assistant id
    pub id: String,
    /// Model the assistant runs on
    #[serde(default)]
    pub model: Option<String>,
}

/// Body of `POST /assistants`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateAssistantRequest {
    /// Model name
    pub model: String,
    /// Display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// System instructions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    /// Enabled tools
    pub tools: Vec<AssistantTool>,
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Body of `POST /threads/{thread_id}/messages`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateMessageRequest {
    /// Always `user` for messages sent by the relay
    pub role: String,
    /// Message text
    pub content: String,
}

impl CreateMessageRequest {
    /// User message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Body of `POST /threads/{thread_id}/runs`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateRunRequest {
    /// Assistant that executes the run
    pub assistant_id: String,
    /// Always `true`: the relay only creates streaming runs
    pub stream: bool,
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Completion token limit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<u32>,
}

/// Body of `POST /threads/{thread_id}/runs/{run_id}/submit_tool_outputs`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitToolOutputsRequest {
    /// One output per required tool call
    pub tool_outputs: Vec<ToolOutput>,
    /// Always `true`: the resumed run is streamed
    #[serde(default)]
    pub stream: bool,
}
