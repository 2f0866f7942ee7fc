//! Tool definitions, required tool calls and tool outputs

use serde::{Deserialize, Serialize};

/// Function call requested by the assistant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Function name
    pub name: String,
    /// JSON-encoded arguments
    pub arguments: String,
}

impl FunctionCall {
    /// Decode the JSON arguments.
    pub fn parse_arguments(&self) -> Result<serde_json::Value, serde_json::Error> {
        if self.arguments.trim().is_empty() {
            return Ok(serde_json::json!({}));
        }
        serde_json::from_str(&self.arguments)
    }
}

/// A tool call the client must execute before the run can continue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequiredActionFunctionToolCall {
    /// Tool call id, echoed back in the matching [`ToolOutput`]
    pub id: String,
    /// Always `function` for client-executed calls
    #[serde(default = "function_type")]
    pub r#type: String,
    /// The requested function
    pub function: FunctionCall,
}

fn function_type() -> String {
    "function".to_string()
}

impl RequiredActionFunctionToolCall {
    /// Create a function tool call
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            r#type: function_type(),
            function: FunctionCall {
                name: name.into(),
                arguments: arguments.into(),
            },
        }
    }
}

/// Result of one tool call, submitted to resume a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOutput {
    /// Function result
    pub output: String,
    /// Id of the tool call this answers
    pub tool_call_id: String,
}

/// Tool definition for function calling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    /// Function name
    pub name: String,
    /// Function description
    pub description: String,
    /// JSON schema for function parameters
    pub parameters: serde_json::Value,
}

/// Tool enabled on an assistant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssistantTool {
    /// Hosted code interpreter
    CodeInterpreter,
    /// Hosted file search
    FileSearch,
    /// Client-executed function
    Function {
        /// Function definition
        function: FunctionDefinition,
    },
}

impl AssistantTool {
    /// Create a function tool
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self::Function {
            function: FunctionDefinition {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }
}
