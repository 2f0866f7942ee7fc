use serde_json::Value;

use crate::error::RelayError;

/// Classify a non-success upstream response.
///
/// The platform answers errors with
/// `{ "error": { "message": "...", "type": "...", "code": "..." } }`.
/// Bodies that don't match the envelope become a plain [`RelayError::ApiError`].
pub fn classify_http_error(status: u16, body_text: &str) -> RelayError {
    match classify_envelope(status, body_text) {
        Some(err) => err,
        None => RelayError::ApiError {
            code: status,
            message: if body_text.trim().is_empty() {
                format!("upstream returned status {status}")
            } else {
                body_text.trim().to_string()
            },
            details: None,
        },
    }
}

fn classify_envelope(status: u16, body_text: &str) -> Option<RelayError> {
    let json: Value = serde_json::from_str(body_text).ok()?;
    let error_obj = json.get("error")?;

    let message = error_obj
        .get("message")
        .and_then(|v| v.as_str())
        .unwrap_or("Unknown error")
        .to_string();
    let error_type = error_obj.get("type").and_then(|v| v.as_str()).unwrap_or("");
    let error_code = error_obj.get("code").and_then(|v| v.as_str()).unwrap_or("");

    let mapped = if status == 401 || error_type == "authentication_error" {
        RelayError::AuthenticationError(message)
    } else if error_type == "insufficient_quota" || error_code == "insufficient_quota" {
        RelayError::QuotaExceededError(message)
    } else if status == 429 || error_type == "rate_limit_error" {
        RelayError::RateLimitError(message)
    } else if status == 404 || error_type == "not_found_error" {
        RelayError::NotFound(message)
    } else if status == 400 && error_type == "invalid_request_error" {
        RelayError::InvalidInput(message)
    } else {
        RelayError::ApiError {
            code: status,
            message,
            details: Some(json.clone()),
        }
    };
    Some(mapped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_invalid_request() {
        let body = r#"{"error":{"message":"bad request","type":"invalid_request_error","code":null}}"#;
        match classify_http_error(400, body) {
            RelayError::InvalidInput(msg) => assert_eq!(msg, "bad request"),
            other => panic!("unexpected error variant: {other:?}"),
        }
    }

    #[test]
    fn maps_missing_thread_to_not_found() {
        let body = r#"{"error":{"message":"No thread found with id 'thread_x'.","type":"invalid_request_error","param":null,"code":null}}"#;
        assert!(matches!(
            classify_http_error(404, body),
            RelayError::NotFound(msg) if msg.contains("thread_x")
        ));
    }

    #[test]
    fn maps_quota_before_rate_limit() {
        let body = r#"{"error":{"message":"You exceeded your current quota","type":"insufficient_quota","code":"insufficient_quota"}}"#;
        assert!(matches!(
            classify_http_error(429, body),
            RelayError::QuotaExceededError(_)
        ));
    }

    #[test]
    fn keeps_details_for_other_errors() {
        let body = r#"{"error":{"message":"Can't add messages while a run is active","type":"invalid_request_error"}}"#;
        match classify_http_error(409, body) {
            RelayError::ApiError { code, details, .. } => {
                assert_eq!(code, 409);
                assert!(details.is_some());
            }
            other => panic!("unexpected error variant: {other:?}"),
        }
    }

    #[test]
    fn plain_bodies_fall_back_to_api_error() {
        match classify_http_error(502, "Bad Gateway") {
            RelayError::ApiError { code, message, .. } => {
                assert_eq!(code, 502);
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("unexpected error variant: {other:?}"),
        }
    }
}
