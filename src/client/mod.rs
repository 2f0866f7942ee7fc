//! Upstream assistant platform client
//!
//! A thin reqwest wrapper over the handful of Assistants API (v2) calls the
//! relay forwards. Streaming calls hand back the raw response body so the
//! relay can pass it through unchanged.

mod errors;

pub use errors::classify_http_error;

use std::borrow::Cow;

use futures_util::StreamExt;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};

use crate::config::RelayConfig;
use crate::error::{RelayError, Result};
use crate::stream::ByteStream;
use crate::types::{
    Assistant, CreateAssistantRequest, CreateMessageRequest, CreateRunRequest,
    SubmitToolOutputsRequest, Thread, ThreadId, ThreadMessage, ToolOutput,
};

const BETA_HEADER: &str = "OpenAI-Beta";
const BETA_VALUE: &str = "assistants=v2";

/// Raw file body plus its content type.
pub struct FileContent {
    /// Upstream `content-type`, when present
    pub content_type: Option<String>,
    /// File bytes
    pub body: ByteStream,
}

/// Client for the assistant platform.
#[derive(Clone)]
pub struct AssistantsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl std::fmt::Debug for AssistantsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssistantsClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl AssistantsClient {
    /// Create a client with a caller-supplied HTTP client.
    pub fn new(config: &RelayConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    /// Create a client with a default HTTP client. No request timeout is set:
    /// runs stream for as long as the platform keeps them open.
    pub fn from_config(config: &RelayConfig) -> Result<Self> {
        config.require_api_key()?;
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| RelayError::HttpError(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self::new(config, http))
    }

    /// Upstream base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let bearer = format!("Bearer {}", self.api_key.expose_secret());
        let mut auth = HeaderValue::from_str(&bearer)
            .map_err(|e| RelayError::ConfigurationError(format!("Invalid API key: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(BETA_HEADER, HeaderValue::from_static(BETA_VALUE));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        tracing::debug!(%method, %url, "upstream request");
        Ok(self.http.request(method, url).headers(self.headers()?))
    }

    async fn send(&self, builder: RequestBuilder) -> Result<reqwest::Response> {
        let response = builder.send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = classify_http_error(status.as_u16(), &body);
        tracing::warn!(status = status.as_u16(), error = %err, "upstream request failed");
        Err(err)
    }

    async fn send_json<T: serde::de::DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.send(builder).await?;
        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| RelayError::ParseError(format!("Unexpected upstream response: {e}")))
    }

    async fn send_stream(&self, builder: RequestBuilder) -> Result<ByteStream> {
        let builder = builder.header(ACCEPT, "text/event-stream");
        let response = self.send(builder).await?;
        Ok(into_byte_stream(response))
    }

    /// `POST /assistants`
    pub async fn create_assistant(&self, request: &CreateAssistantRequest) -> Result<Assistant> {
        let builder = self.request(Method::POST, "assistants")?.json(request);
        self.send_json(builder).await
    }

    /// `POST /threads`
    pub async fn create_thread(&self) -> Result<Thread> {
        let builder = self
            .request(Method::POST, "threads")?
            .json(&serde_json::json!({}));
        self.send_json(builder).await
    }

    /// `POST /threads/{thread_id}/messages` with a user message.
    pub async fn create_message(&self, thread_id: &ThreadId, content: &str) -> Result<ThreadMessage> {
        let thread = path_segment("thread id", thread_id.as_str())?;
        let path = format!("threads/{thread}/messages");
        let builder = self
            .request(Method::POST, &path)?
            .json(&CreateMessageRequest::user(content));
        self.send_json(builder).await
    }

    /// `POST /threads/{thread_id}/runs` with `stream: true`; returns the raw event stream.
    pub async fn create_run_stream(
        &self,
        thread_id: &ThreadId,
        request: &CreateRunRequest,
    ) -> Result<ByteStream> {
        let thread = path_segment("thread id", thread_id.as_str())?;
        let path = format!("threads/{thread}/runs");
        let builder = self.request(Method::POST, &path)?.json(request);
        self.send_stream(builder).await
    }

    /// `POST /threads/{thread_id}/runs/{run_id}/submit_tool_outputs` with `stream: true`.
    pub async fn submit_tool_outputs_stream(
        &self,
        thread_id: &ThreadId,
        run_id: &str,
        tool_outputs: Vec<ToolOutput>,
    ) -> Result<ByteStream> {
        let thread = path_segment("thread id", thread_id.as_str())?;
        let run = path_segment("run id", run_id)?;
        let path = format!("threads/{thread}/runs/{run}/submit_tool_outputs");
        let body = SubmitToolOutputsRequest {
            tool_outputs,
            stream: true,
        };
        let builder = self.request(Method::POST, &path)?.json(&body);
        self.send_stream(builder).await
    }

    /// `GET /files/{file_id}/content`
    pub async fn file_content(&self, file_id: &str) -> Result<FileContent> {
        let file = path_segment("file id", file_id)?;
        let path = format!("files/{file}/content");
        let response = self.send(self.request(Method::GET, &path)?).await?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        Ok(FileContent {
            content_type,
            body: into_byte_stream(response),
        })
    }
}

/// Encode a caller-supplied id as exactly one upstream path segment.
///
/// Ids reach the relay from request paths and bodies; `/`, `?` and `#` are
/// percent-encoded and dot segments are refused so an id can never leave the
/// route it was meant for.
fn path_segment<'a>(name: &str, value: &'a str) -> Result<Cow<'a, str>> {
    if value.is_empty() || value == "." || value == ".." {
        return Err(RelayError::InvalidInput(format!("invalid {name}: {value:?}")));
    }
    Ok(urlencoding::encode(value))
}

/// Turn a response body into a [`ByteStream`] without touching the bytes.
pub(crate) fn into_byte_stream(response: reqwest::Response) -> ByteStream {
    Box::pin(
        response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| RelayError::HttpError(format!("Stream error: {e}")))),
    )
}
