//! Assistant stream processing
//!
//! Bytes from the platform pass through three stages:
//!
//! 1. [`decoder`]: SSE frames into typed [`AssistantStreamEvent`](crate::types::AssistantStreamEvent)s
//! 2. [`accumulator`]: vendor events into the helper events a chat view cares about
//!    (text created, text delta, tool call created, ...)
//! 3. [`dispatcher`]: helper events applied to a [`Transcript`](crate::chat::Transcript)

pub mod accumulator;
pub mod annotations;
pub mod decoder;
pub mod dispatcher;

use std::pin::Pin;

use bytes::Bytes;
use futures_util::Stream;

use crate::error::RelayError;

pub use accumulator::{HelperAccumulator, StreamEvent, helper_events};
pub use annotations::resolve_annotations;
pub use decoder::{EventStream, decode_events};
pub use dispatcher::{Dispatch, Update, dispatch};

/// Raw response body of a streaming call.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, RelayError>> + Send>>;
