//! Core error types.

use serde_json::Value;
use thiserror::Error;

/// Broad classification of a [`RelayError`].
///
/// The relay server uses the category to pick an HTTP status when a request
/// fails before any stream bytes were written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The caller sent something the upstream or the relay rejected.
    Client,
    /// The upstream platform failed.
    Server,
    /// Transport-level failure (connect, reset, aborted body).
    Network,
    /// Missing or rejected credentials.
    Authentication,
    /// Rate limited or out of quota.
    RateLimit,
    /// A payload could not be decoded.
    Parsing,
    /// Invalid or incomplete local configuration.
    Configuration,
    /// A client-side function call failed.
    Function,
    /// Anything else.
    Unknown,
}

/// Errors produced anywhere in the relay, the stream dispatcher or the chat session.
#[derive(Error, Debug, Clone)]
pub enum RelayError {
    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// API key not provided
    #[error("Missing API key: {0}")]
    MissingApiKey(String),

    /// Transport failure talking to the upstream platform or the relay
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Non-success response from the upstream platform
    #[error("API error {code}: {message}")]
    ApiError {
        /// HTTP status code
        code: u16,
        /// Error message
        message: String,
        /// Raw error body, when it was JSON
        details: Option<Value>,
    },

    /// Credentials were rejected
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    /// Too many requests
    #[error("Rate limit exceeded: {0}")]
    RateLimitError(String),

    /// Account quota exhausted
    #[error("Quota exceeded: {0}")]
    QuotaExceededError(String),

    /// Resource (thread, run, file) not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request rejected as invalid
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Payload could not be parsed
    #[error("Parse error: {0}")]
    ParseError(String),

    /// JSON (de)serialization failure
    #[error("JSON error: {0}")]
    JsonError(String),

    /// The event stream failed or reported an error event
    #[error("Stream error: {0}")]
    StreamError(String),

    /// A client-side function handler failed
    #[error("Function call '{name}' failed: {message}")]
    FunctionCallError {
        /// Function name requested by the assistant
        name: String,
        /// Failure description
        message: String,
    },

    /// Local I/O failure
    #[error("IO error: {0}")]
    IoError(String),

    /// Unexpected internal condition
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl RelayError {
    /// Build an upstream API error without details.
    pub fn api_error(code: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Build a function-call error.
    pub fn function_call(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FunctionCallError {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigurationError(_) => ErrorCategory::Configuration,
            Self::MissingApiKey(_) | Self::AuthenticationError(_) => ErrorCategory::Authentication,
            Self::HttpError(_) | Self::StreamError(_) | Self::IoError(_) => ErrorCategory::Network,
            Self::ApiError { code, .. } => match *code {
                401 | 403 => ErrorCategory::Authentication,
                429 => ErrorCategory::RateLimit,
                400..=499 => ErrorCategory::Client,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Unknown,
            },
            Self::RateLimitError(_) | Self::QuotaExceededError(_) => ErrorCategory::RateLimit,
            Self::NotFound(_) | Self::InvalidInput(_) => ErrorCategory::Client,
            Self::ParseError(_) | Self::JsonError(_) => ErrorCategory::Parsing,
            Self::FunctionCallError { .. } => ErrorCategory::Function,
            Self::InternalError(_) => ErrorCategory::Unknown,
        }
    }

    /// HTTP status the relay answers with when this error ends a request.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ApiError { code, .. } if (400..=599).contains(code) => *code,
            Self::NotFound(_) => 404,
            Self::InvalidInput(_) | Self::ParseError(_) | Self::JsonError(_) => 400,
            Self::AuthenticationError(_) => 401,
            Self::RateLimitError(_) | Self::QuotaExceededError(_) => 429,
            Self::HttpError(_) | Self::StreamError(_) => 502,
            _ => 500,
        }
    }

    /// Short message suitable for showing to an end user.
    pub fn user_message(&self) -> String {
        match self {
            Self::ConfigurationError(msg) => format!("The relay is misconfigured: {msg}"),
            Self::MissingApiKey(_) => "No API key configured for the assistant platform".into(),
            Self::AuthenticationError(_) => "The assistant platform rejected the API key".into(),
            Self::RateLimitError(_) | Self::QuotaExceededError(_) => {
                "The assistant platform is rate limiting requests, try again later".into()
            }
            Self::NotFound(msg) => format!("Not found: {msg}"),
            Self::InvalidInput(msg) => format!("Invalid request: {msg}"),
            Self::ApiError { message, .. } => message.clone(),
            Self::FunctionCallError { name, message } => {
                format!("Function '{name}' failed: {message}")
            }
            other => other.to_string(),
        }
    }
}
