//! Error Handling Module
//!
//! One error type for the whole crate:
//! - `RelayError` and its `ErrorCategory`
//! - HTTP status mapping used by the relay server
//! - conversions from the transport and serialization errors we touch
//!
//! # Example
//!
//! ```rust,ignore
//! use assistant_relay::error::{RelayError, ErrorCategory};
//!
//! let error = RelayError::api_error(404, "No thread found");
//! assert_eq!(error.category(), ErrorCategory::Client);
//! ```

mod conversions;
pub mod types;

pub use types::*;

/// Result type used across the crate.
pub type Result<T> = std::result::Result<T, RelayError>;
