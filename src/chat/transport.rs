//! Transport between the chat session and the relay

use async_trait::async_trait;
use reqwest::header::ACCEPT;

use crate::client::into_byte_stream;
use crate::config::ChatClientConfig;
use crate::error::{RelayError, Result};
use crate::routes::{self, api_url};
use crate::stream::ByteStream;
use crate::types::{
    ErrorBody, SendMessageBody, SubmitActionsBody, ThreadCreated, ThreadId, ToolOutput,
};

/// Calls the chat session makes.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Start a conversation thread.
    async fn create_thread(&self) -> Result<ThreadId>;

    /// Post a user message; the response streams the run it started.
    async fn send_message(&self, thread_id: &ThreadId, content: &str) -> Result<ByteStream>;

    /// Submit function outputs; the response streams the resumed run.
    async fn submit_tool_outputs(
        &self,
        thread_id: &ThreadId,
        run_id: &str,
        outputs: Vec<ToolOutput>,
    ) -> Result<ByteStream>;
}

/// [`ChatTransport`] speaking HTTP to the relay.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    api_base: String,
}

impl HttpTransport {
    /// `server_url` is the relay origin, e.g. `http://localhost:3091`.
    pub fn new(server_url: &str, http: reqwest::Client) -> Self {
        Self {
            http,
            api_base: format!(
                "{}{}",
                server_url.trim_end_matches('/'),
                routes::API_BASE
            ),
        }
    }

    pub fn from_config(config: &ChatClientConfig) -> Self {
        Self::new(&config.server_url, reqwest::Client::new())
    }

    async fn post<B: serde::Serialize + Sync>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
        body: &B,
    ) -> Result<reqwest::Response> {
        let url = api_url(&self.api_base, endpoint, params)?;
        tracing::debug!(%url, "relay request");
        let response = self
            .http
            .post(&url)
            .header(ACCEPT, "application/json, text/event-stream")
            .json(body)
            .send()
            .await
            .map_err(|e| RelayError::HttpError(format!("Failed to reach relay: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error)
            .unwrap_or(text);
        Err(RelayError::api_error(status.as_u16(), message))
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn create_thread(&self) -> Result<ThreadId> {
        let response = self
            .post(routes::CREATE_THREAD, &[], &serde_json::json!({}))
            .await?;
        let created: ThreadCreated = response
            .json()
            .await
            .map_err(|e| RelayError::ParseError(format!("Invalid thread response: {e}")))?;
        Ok(ThreadId::from(created.thread_id))
    }

    async fn send_message(&self, thread_id: &ThreadId, content: &str) -> Result<ByteStream> {
        let body = SendMessageBody {
            content: content.to_string(),
        };
        let response = self
            .post(
                routes::SEND_MESSAGE,
                &[("threadId", thread_id.as_str())],
                &body,
            )
            .await?;
        Ok(into_byte_stream(response))
    }

    async fn submit_tool_outputs(
        &self,
        thread_id: &ThreadId,
        run_id: &str,
        outputs: Vec<ToolOutput>,
    ) -> Result<ByteStream> {
        let body = SubmitActionsBody {
            run_id: run_id.to_string(),
            tool_call_outputs: outputs,
        };
        let response = self
            .post(routes::ACTIONS, &[("threadId", thread_id.as_str())], &body)
            .await?;
        Ok(into_byte_stream(response))
    }
}
