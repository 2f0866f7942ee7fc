//! `assistant-relay`: the relay server
//!
//! Configuration comes from the environment (`OPENAI_API_KEY`,
//! `OPENAI_ASSISTANT_ID`, `RELAY_HOST`, `RELAY_PORT`, ...). Logging is
//! controlled by `RELAY_LOG_LEVEL`, `RELAY_LOG_FORMAT` and `RELAY_LOG_FILE`.

use assistant_relay::config::RelayConfig;
use assistant_relay::server::{self, AppState};
use assistant_relay::telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _guard = telemetry::init_from_env()?;

    let config = RelayConfig::from_env()?;
    config.require_api_key()?;
    if config.assistant_id.is_none() {
        tracing::warn!(
            "OPENAI_ASSISTANT_ID is not set: create one with POST /api/assistants, then restart with it"
        );
    }
    tracing::info!(
        base_url = %config.base_url,
        model = %config.models.chat,
        temperature = config.temperature,
        max_tokens = config.max_tokens,
        "relay configured"
    );

    let state = AppState::from_config(config)?;
    server::serve(state).await?;
    Ok(())
}
