//! Chat session over the relay
//!
//! A [`ChatSession`] owns the thread id and the [`Transcript`], sends user
//! messages through a [`ChatTransport`] and feeds the returned streams to the
//! dispatcher until the run completes.

pub mod session;
pub mod transcript;
pub mod transport;

pub use session::{ChatObserver, ChatSession};
pub use transcript::{Message, Role, Transcript};
pub use transport::{ChatTransport, HttpTransport};
