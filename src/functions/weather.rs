//! Mock weather function

use async_trait::async_trait;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::Mutex;

use super::FunctionCallHandler;
use crate::error::{RelayError, Result};
use crate::types::{AssistantTool, RequiredActionFunctionToolCall};

/// Name the assistant uses to call the weather function.
pub const WEATHER_FUNCTION: &str = "get_weather";

const CONDITIONS: [&str; 4] = ["Sunny", "Cloudy", "Rainy", "Snowy"];

/// Result of a weather lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location: String,
    /// Degrees Fahrenheit
    pub temperature: u32,
    pub conditions: String,
}

/// Made-up weather for `location`.
pub fn get_weather(location: &str) -> WeatherReport {
    let mut rng = rand::thread_rng();
    let conditions = CONDITIONS.choose(&mut rng).copied().unwrap_or("Sunny");
    WeatherReport {
        location: location.to_string(),
        temperature: rng.gen_range(50..=90),
        conditions: conditions.to_string(),
    }
}

/// Function tool definition registered on the assistant.
pub fn weather_tool() -> AssistantTool {
    AssistantTool::function(
        WEATHER_FUNCTION,
        "Determine weather in my location",
        json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": "The city and state e.g. San Francisco, CA"
                },
                "unit": {
                    "type": "string",
                    "enum": ["c", "f"]
                }
            },
            "required": ["location"]
        }),
    )
}

/// Answers `get_weather` calls and keeps the latest report.
#[derive(Debug, Default)]
pub struct WeatherFunctionHandler {
    latest: Mutex<Option<WeatherReport>>,
}

impl WeatherFunctionHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last report handed to the assistant
    pub async fn latest(&self) -> Option<WeatherReport> {
        self.latest.lock().await.clone()
    }
}

#[async_trait]
impl FunctionCallHandler for WeatherFunctionHandler {
    async fn call(&self, call: &RequiredActionFunctionToolCall) -> Result<String> {
        if call.function.name != WEATHER_FUNCTION {
            return Ok(String::new());
        }

        let args = call
            .function
            .parse_arguments()
            .map_err(|e| RelayError::function_call(WEATHER_FUNCTION, format!("invalid arguments: {e}")))?;
        let location = args
            .get("location")
            .and_then(|v| v.as_str())
            .ok_or_else(|| RelayError::function_call(WEATHER_FUNCTION, "missing 'location'"))?;

        let report = get_weather(location);
        tracing::info!(location, temperature = report.temperature, conditions = %report.conditions, "weather lookup");
        let output = serde_json::to_string(&report)?;
        *self.latest.lock().await = Some(report);
        Ok(output)
    }
}
