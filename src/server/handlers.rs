//! Route handlers

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};

use super::AppState;
use super::response::{error_response, relay_file, relay_stream};
use crate::error::{RelayError, Result};
use crate::functions::weather_tool;
use crate::types::{
    AssistantCreated, AssistantTool, CreateAssistantRequest, CreateRunRequest, SendMessageBody,
    SubmitActionsBody, ThreadCreated, ThreadId,
};

const ASSISTANT_NAME: &str = "Quickstart Assistant";
const ASSISTANT_INSTRUCTIONS: &str = "You are a helpful assistant.";

impl AppState {
    fn respond(&self, result: Result<Response>) -> Response {
        result.unwrap_or_else(|e| error_response(&e, &self.options))
    }
}

fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| RelayError::InvalidInput(rejection.body_text()))
}

/// `POST /api/assistants`
pub(super) async fn create_assistant(State(state): State<AppState>) -> Response {
    let result: Result<Response> = async {
        let request = CreateAssistantRequest {
            model: state.config.models.chat.clone(),
            name: Some(ASSISTANT_NAME.to_string()),
            instructions: Some(ASSISTANT_INSTRUCTIONS.to_string()),
            tools: vec![
                AssistantTool::CodeInterpreter,
                weather_tool(),
                AssistantTool::FileSearch,
            ],
            temperature: Some(state.config.temperature),
        };
        let assistant = state.client.create_assistant(&request).await?;
        tracing::info!(assistant_id = %assistant.id, "assistant created");
        Ok::<_, RelayError>(Json(AssistantCreated {
            assistant_id: assistant.id,
        })
        .into_response())
    }
    .await;
    state.respond(result)
}

/// `POST /api/assistants/threads`
pub(super) async fn create_thread(State(state): State<AppState>) -> Response {
    let result: Result<Response> = async {
        let thread = state.client.create_thread().await?;
        tracing::debug!(thread_id = %thread.id, "thread created");
        Ok::<_, RelayError>(Json(ThreadCreated {
            thread_id: thread.id.to_string(),
        })
        .into_response())
    }
    .await;
    state.respond(result)
}

/// `POST /api/assistants/threads/{threadId}/messages`
pub(super) async fn send_message(
    State(state): State<AppState>,
    Path(thread_id): Path<String>,
    payload: std::result::Result<Json<SendMessageBody>, JsonRejection>,
) -> Response {
    let result: Result<Response> = async {
        let body = json_body(payload)?;
        let assistant_id = state.config.assistant_id.clone().ok_or_else(|| {
            RelayError::ConfigurationError("OPENAI_ASSISTANT_ID is not set".to_string())
        })?;
        if body.content.trim().is_empty() {
            return Err(RelayError::InvalidInput("content must not be empty".to_string()));
        }

        let thread_id = ThreadId::from(thread_id);
        state.client.create_message(&thread_id, &body.content).await?;

        let run = CreateRunRequest {
            assistant_id,
            stream: true,
            temperature: Some(state.config.temperature),
            max_completion_tokens: Some(state.config.max_tokens),
        };
        let stream = state.client.create_run_stream(&thread_id, &run).await?;
        tracing::debug!(thread_id = %thread_id, "relaying run stream");
        Ok::<_, RelayError>(relay_stream(stream))
    }
    .await;
    state.respond(result)
}

/// `POST /api/assistants/threads/{threadId}/actions`
pub(super) async fn submit_actions(
    State(state): State<AppState>,
    Path(thread_id): Path<String>,
    payload: std::result::Result<Json<SubmitActionsBody>, JsonRejection>,
) -> Response {
    let result: Result<Response> = async {
        let body = json_body(payload)?;
        let thread_id = ThreadId::from(thread_id);
        tracing::debug!(
            thread_id = %thread_id,
            run_id = %body.run_id,
            outputs = body.tool_call_outputs.len(),
            "submitting tool outputs"
        );
        let stream = state
            .client
            .submit_tool_outputs_stream(&thread_id, &body.run_id, body.tool_call_outputs)
            .await?;
        Ok::<_, RelayError>(relay_stream(stream))
    }
    .await;
    state.respond(result)
}

/// `GET /api/files/{fileId}`
pub(super) async fn file_content(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
) -> Response {
    let result: Result<Response> = async {
        let file = state.client.file_content(&file_id).await?;
        Ok::<_, RelayError>(relay_file(file.content_type, file.body))
    }
    .await;
    state.respond(result)
}
