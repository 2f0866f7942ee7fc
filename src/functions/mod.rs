//! Client-side function calling
//!
//! When a run pauses with `requires_action`, every pending call is handed to a
//! [`FunctionCallHandler`]; the returned strings are submitted as tool outputs.

pub mod weather;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::RequiredActionFunctionToolCall;

pub use weather::{WeatherFunctionHandler, WeatherReport, get_weather, weather_tool};

/// Executes function calls requested by a run.
#[async_trait]
pub trait FunctionCallHandler: Send + Sync {
    /// Run one call and return its output. An error aborts the whole round trip.
    async fn call(&self, call: &RequiredActionFunctionToolCall) -> Result<String>;
}

/// Answers every call with an empty string.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFunctionHandler;

#[async_trait]
impl FunctionCallHandler for NoopFunctionHandler {
    async fn call(&self, call: &RequiredActionFunctionToolCall) -> Result<String> {
        tracing::debug!(name = %call.function.name, "no function handler configured");
        Ok(String::new())
    }
}

#[async_trait]
impl<H: FunctionCallHandler + ?Sized> FunctionCallHandler for Arc<H> {
    async fn call(&self, call: &RequiredActionFunctionToolCall) -> Result<String> {
        (**self).call(call).await
    }
}
