//! Response helpers: stream relaying and error bodies

use axum::Json;
use axum::body::Body;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};

use crate::config::AppEnvironment;
use crate::error::RelayError;
use crate::stream::ByteStream;
use crate::types::ErrorBody;

const MASKED_ERROR: &str = "internal error";

/// How the relay reports failures.
#[derive(Debug, Clone)]
pub struct RelayOptions {
    /// Replace server-side error messages with a generic one.
    pub mask_errors: bool,
    /// Message used when masking; defaults to "internal error".
    pub masked_error_message: Option<String>,
}

impl Default for RelayOptions {
    fn default() -> Self {
        Self {
            mask_errors: true,
            masked_error_message: None,
        }
    }
}

impl RelayOptions {
    pub fn development() -> Self {
        Self {
            mask_errors: false,
            ..Default::default()
        }
    }

    pub fn production() -> Self {
        Self::default()
    }

    pub fn for_environment(environment: AppEnvironment) -> Self {
        if environment.is_production() {
            Self::production()
        } else {
            Self::development()
        }
    }
}

/// Relay an upstream event stream unchanged.
pub fn relay_stream(stream: ByteStream) -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .header("x-accel-buffering", "no")
        .body(Body::from_stream(stream))
        .unwrap_or_else(|_| Response::new(Body::from(MASKED_ERROR)))
}

/// Relay file bytes with the upstream content type.
pub(crate) fn relay_file(content_type: Option<String>, body: ByteStream) -> Response {
    let content_type = content_type
        .and_then(|ct| HeaderValue::from_str(&ct).ok())
        .unwrap_or_else(|| HeaderValue::from_static("application/octet-stream"));
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from_stream(body))
        .unwrap_or_else(|_| Response::new(Body::from(MASKED_ERROR)))
}

/// JSON `{ "error": message }` with the status of `error`.
///
/// With masking on, only client errors (4xx) keep their message.
pub fn error_response(error: &RelayError, options: &RelayOptions) -> Response {
    let status =
        StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if status.is_server_error() {
        tracing::error!(error = %error, category = ?error.category(), "request failed");
    } else {
        tracing::warn!(error = %error, "request rejected");
    }

    let message = if options.mask_errors && status.is_server_error() {
        options
            .masked_error_message
            .clone()
            .unwrap_or_else(|| MASKED_ERROR.to_string())
    } else {
        error.user_message()
    };

    (status, Json(ErrorBody { error: message })).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn development_errors_keep_their_message() {
        let err = RelayError::ConfigurationError("OPENAI_ASSISTANT_ID is not set".into());
        let response = error_response(&err, &RelayOptions::development());
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("OPENAI_ASSISTANT_ID"));
    }

    #[tokio::test]
    async fn production_masks_server_errors_only() {
        let options = RelayOptions::production();

        let response = error_response(&RelayError::HttpError("dns failure".into()), &options);
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body_json(response).await["error"], "internal error");

        let response = error_response(&RelayError::NotFound("No thread found".into()), &options);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_json(response).await["error"].as_str().unwrap().contains("No thread found"));
    }

    #[tokio::test]
    async fn relayed_streams_are_event_streams() {
        let stream: ByteStream = Box::pin(futures_util::stream::iter(vec![Ok::<_, RelayError>(bytes::Bytes::from_static(
            b"event: done\ndata: [DONE]\n\n",
        ))]));
        let response = relay_stream(stream);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/event-stream");
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"event: done\ndata: [DONE]\n\n");
    }
}
