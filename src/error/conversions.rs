//! Conversions from third-party error types.

use super::RelayError;

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::ParseError(format!("Failed to decode response: {err}"));
        }
        if let Some(status) = err.status() {
            return Self::ApiError {
                code: status.as_u16(),
                message: err.to_string(),
                details: None,
            };
        }
        Self::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}

impl From<std::io::Error> for RelayError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_errors_become_json_variant() {
        let err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let relay: RelayError = err.into();
        assert!(matches!(relay, RelayError::JsonError(_)));
    }

    #[test]
    fn io_errors_keep_their_message() {
        let err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let relay: RelayError = err.into();
        match relay {
            RelayError::IoError(msg) => assert!(msg.contains("pipe closed")),
            other => panic!("unexpected error variant: {other:?}"),
        }
    }
}
