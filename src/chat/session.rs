//! Chat session state machine

use futures::future::try_join_all;
use futures_util::StreamExt;

use super::transcript::{Message, Role, Transcript};
use super::transport::ChatTransport;
use crate::error::{RelayError, Result};
use crate::functions::{FunctionCallHandler, NoopFunctionHandler};
use crate::stream::{ByteStream, Dispatch, Update, decode_events, dispatch, helper_events};
use crate::types::{RequiredActionFunctionToolCall, ThreadId, ToolOutput};

/// Receives transcript changes while a stream is consumed.
pub trait ChatObserver: Send + Sync {
    /// A message was appended or changed.
    fn on_update(&self, update: Update, message: &Message);

    /// The run completed and input is enabled again.
    fn on_run_completed(&self) {}
}

/// One conversation with the assistant.
pub struct ChatSession<T, H = NoopFunctionHandler> {
    transport: T,
    handler: H,
    thread_id: Option<ThreadId>,
    transcript: Transcript,
    observer: Option<Box<dyn ChatObserver>>,
}

impl<T: ChatTransport> ChatSession<T> {
    /// Session whose function calls all return `""`.
    pub fn new(transport: T) -> Self {
        Self::with_handler(transport, NoopFunctionHandler)
    }
}

impl<T, H> ChatSession<T, H>
where
    T: ChatTransport,
    H: FunctionCallHandler,
{
    pub fn with_handler(transport: T, handler: H) -> Self {
        Self {
            transport,
            handler,
            thread_id: None,
            transcript: Transcript::new(),
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: impl ChatObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn thread_id(&self) -> Option<&ThreadId> {
        self.thread_id.as_ref()
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Create the thread this session talks on. Calling it again keeps the existing thread.
    pub async fn start(&mut self) -> Result<ThreadId> {
        if let Some(thread_id) = &self.thread_id {
            return Ok(thread_id.clone());
        }
        let thread_id = self.transport.create_thread().await?;
        tracing::info!(thread_id = %thread_id, "chat thread created");
        self.thread_id = Some(thread_id.clone());
        Ok(thread_id)
    }

    /// Send a user message and consume the run until its stream ends.
    ///
    /// Blank input is rejected before anything changes. Input stays disabled
    /// until the run reports completion.
    pub async fn send(&mut self, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Err(RelayError::InvalidInput("message is empty".to_string()));
        }
        if self.transcript.input_disabled() {
            return Err(RelayError::InvalidInput(
                "a run is still in progress".to_string(),
            ));
        }
        let thread_id = self.start().await?;

        let index = self.transcript.push(Message::new(Role::User, text));
        self.notify(Update::Appended(index));
        self.transcript.set_input_disabled(true);

        let stream = self.transport.send_message(&thread_id, text).await?;
        self.consume(&thread_id, stream).await
    }

    /// Re-enable input after a run ended without completing.
    pub fn recover_input(&mut self) {
        self.transcript.set_input_disabled(false);
    }

    async fn consume(&mut self, thread_id: &ThreadId, stream: ByteStream) -> Result<()> {
        let mut next = Some(stream);
        while let Some(bytes) = next.take() {
            let mut events = Box::pin(helper_events(decode_events(bytes)));
            while let Some(event) = events.next().await {
                match dispatch(&mut self.transcript, event?) {
                    Dispatch::Updated(update) => self.notify(update),
                    Dispatch::Ignored => {}
                    Dispatch::RequiresAction { run_id, tool_calls } => {
                        let outputs = self.run_functions(&tool_calls).await?;
                        tracing::debug!(%run_id, outputs = outputs.len(), "submitting tool outputs");
                        next = Some(
                            self.transport
                                .submit_tool_outputs(thread_id, &run_id, outputs)
                                .await?,
                        );
                        break;
                    }
                    Dispatch::RunCompleted => {
                        if let Some(observer) = &self.observer {
                            observer.on_run_completed();
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Run every call concurrently; outputs keep the order of the calls.
    async fn run_functions(
        &self,
        tool_calls: &[RequiredActionFunctionToolCall],
    ) -> Result<Vec<ToolOutput>> {
        try_join_all(tool_calls.iter().map(|call| async move {
            let output = self.handler.call(call).await?;
            Ok::<_, RelayError>(ToolOutput {
                output,
                tool_call_id: call.id.clone(),
            })
        }))
        .await
    }

    fn notify(&self, update: Update) {
        if let (Some(observer), Some(message)) = (
            &self.observer,
            self.transcript.messages().get(update.index()),
        ) {
            observer.on_update(update, message);
        }
    }
}
