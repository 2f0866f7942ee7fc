//! # Assistant Relay
//!
//! A streaming relay in front of a hosted assistant platform (OpenAI
//! Assistants v2), plus the client side of the conversation: decoding the
//! relayed event stream, turning it into transcript updates and answering
//! function calls so paused runs can resume.
//!
#![deny(unsafe_code)]

//! ## Layout
//!
//! - **Relay**: [`server`] exposes create-assistant, create-thread,
//!   send-message, submit-tool-outputs and file routes; [`client`] talks to the platform.
//! - **Streams**: [`stream`] decodes SSE into typed events, derives helper
//!   events and dispatches them onto a transcript.
//! - **Chat**: [`chat`] owns the thread, the transcript and the
//!   requires-action round trip; [`functions`] holds the function handlers.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use assistant_relay::chat::{ChatSession, HttpTransport};
//! use assistant_relay::functions::WeatherFunctionHandler;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = HttpTransport::new("http://localhost:3091", reqwest::Client::new());
//!     let mut session = ChatSession::with_handler(transport, WeatherFunctionHandler::new());
//!
//!     session.start().await?;
//!     session.send("What's the weather in Paris?").await?;
//!     for message in session.transcript().messages() {
//!         println!("{:?}: {}", message.role, message);
//!     }
//!     Ok(())
//! }
//! ```

pub mod chat;
pub mod client;
pub mod config;
pub mod error;
pub mod functions;
pub mod routes;
pub mod server;
pub mod stream;
pub mod telemetry;
pub mod types;

pub use error::{RelayError, Result};

/// Commonly used types
pub mod prelude {
    pub use crate::chat::{ChatObserver, ChatSession, ChatTransport, HttpTransport, Message, Role, Transcript};
    pub use crate::client::AssistantsClient;
    pub use crate::config::{AppEnvironment, ChatClientConfig, RelayConfig};
    pub use crate::error::{ErrorCategory, RelayError, Result};
    pub use crate::functions::{FunctionCallHandler, NoopFunctionHandler, WeatherFunctionHandler};
    pub use crate::stream::{Dispatch, StreamEvent, Update};
    pub use crate::types::{RequiredActionFunctionToolCall, ThreadId, ToolOutput};
}
