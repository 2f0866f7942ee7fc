//! SSE decoding of assistant streams

use std::fmt::Display;
use std::pin::Pin;

use eventsource_stream::Eventsource;
use futures_util::{Stream, StreamExt};

use crate::error::{RelayError, Result};
use crate::types::AssistantStreamEvent;

/// Stream of decoded platform events.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<AssistantStreamEvent>> + Send>>;

/// Decode a byte stream of SSE frames into [`AssistantStreamEvent`]s.
///
/// - Keep-alive comments and empty `data:` payloads are skipped.
/// - `done` ends the stream after yielding [`AssistantStreamEvent::Done`].
/// - An `error` event ends the stream with [`RelayError::StreamError`].
/// - Malformed JSON ends the stream with [`RelayError::ParseError`].
pub fn decode_events<S, B, E>(byte_stream: S) -> EventStream
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
{
    let out = async_stream::stream! {
        let mut sse = Box::pin(byte_stream.eventsource());

        while let Some(item) = sse.next().await {
            let frame = match item {
                Ok(frame) => frame,
                Err(e) => {
                    yield Err(RelayError::StreamError(format!("SSE stream error: {e}")));
                    return;
                }
            };

            if frame.data.trim().is_empty() {
                continue;
            }

            match AssistantStreamEvent::from_sse(&frame.event, &frame.data) {
                Ok(AssistantStreamEvent::Done) => {
                    yield Ok(AssistantStreamEvent::Done);
                    return;
                }
                Ok(AssistantStreamEvent::Error(err)) => {
                    let message = err
                        .message
                        .unwrap_or_else(|| "assistant stream reported an error".to_string());
                    tracing::warn!(code = ?err.code, %message, "error event in assistant stream");
                    yield Err(RelayError::StreamError(message));
                    return;
                }
                Ok(event) => {
                    tracing::trace!(event = event.name(), "assistant stream event");
                    yield Ok(event);
                }
                Err(e) => {
                    yield Err(e);
                    return;
                }
            }
        }
    };

    Box::pin(out)
}
