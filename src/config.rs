//! Environment-driven configuration
//!
//! The relay server reads everything it needs from environment variables:
//!
//! - `OPENAI_API_KEY`: upstream API key (required to serve)
//! - `OPENAI_BASE_URL`: upstream base URL (default `https://api.openai.com/v1`)
//! - `OPENAI_LOCAL_BASE_URL`: upstream used when `APP_ENV=local`
//! - `OPENAI_ASSISTANT_ID`: assistant that runs are created for
//! - `OPENAI_CHAT_MODEL`, `OPENAI_GEN_IMAGE_MODEL`, `OPENAI_GEN_AUDIO_MODEL`,
//!   `OPENAI_GEN_AUDIO_VOICE`: model names
//! - `OPENAI_TEMPERATURE`, `OPENAI_MAX_TOKENS`: run sampling settings
//! - `APP_ENV`: `local`, `development` or `production`
//! - `RELAY_HOST`, `RELAY_PORT`: bind address
//!
//! The terminal client only needs `RELAY_SERVER_URL`.

use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};

use crate::error::{RelayError, Result};

/// Default upstream base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
/// Default upstream base URL in the `local` environment.
pub const DEFAULT_LOCAL_BASE_URL: &str = "http://localhost:11434/v1";
/// Default port of the relay server.
pub const DEFAULT_PORT: u16 = 3091;
/// Default relay URL used by the terminal client.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:3091";

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppEnvironment {
    /// Local development against a local OpenAI-compatible upstream.
    Local,
    /// Development against the hosted platform.
    #[default]
    Development,
    /// Production: error details are masked in responses.
    Production,
}

impl AppEnvironment {
    /// `true` for production deployments.
    pub fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }

    /// `true` for development and local deployments.
    pub fn is_dev_or_local(self) -> bool {
        !self.is_production()
    }
}

impl FromStr for AppEnvironment {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" | "prod" => Ok(Self::Production),
            // Anything else behaves like development.
            _ => Ok(Self::Development),
        }
    }
}

/// Model names used by the relay.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    /// Model for assistants created through the relay
    pub chat: String,
    /// Image generation model
    pub gen_image: String,
    /// Speech generation model
    pub gen_audio: String,
    /// Speech generation voice
    pub gen_audio_voice: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            chat: "gpt-4o-mini".to_string(),
            gen_image: "dall-e-2".to_string(),
            gen_audio: "tts-1".to_string(),
            gen_audio_voice: "alloy".to_string(),
        }
    }
}

/// Relay server configuration.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Upstream API key
    pub api_key: SecretString,
    /// Upstream base URL, without trailing slash
    pub base_url: String,
    /// Assistant used for runs
    pub assistant_id: Option<String>,
    /// Model names
    pub models: ModelConfig,
    /// Run temperature
    pub temperature: f32,
    /// Run completion token limit
    pub max_tokens: u32,
    /// Deployment environment
    pub environment: AppEnvironment,
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            api_key: SecretString::from(String::new()),
            base_url: DEFAULT_BASE_URL.to_string(),
            assistant_id: None,
            models: ModelConfig::default(),
            temperature: 0.5,
            max_tokens: 500,
            environment: AppEnvironment::default(),
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl RelayConfig {
    /// Create a configuration with the given API key and defaults for everything else.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            ..Default::default()
        }
    }

    /// Override the upstream base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the assistant used for runs.
    pub fn with_assistant_id(mut self, assistant_id: impl Into<String>) -> Self {
        self.assistant_id = Some(assistant_id.into());
        self
    }

    /// Set the run temperature.
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the completion token limit.
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the deployment environment.
    pub const fn with_environment(mut self, environment: AppEnvironment) -> Self {
        self.environment = environment;
        self
    }

    /// Load the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let environment = match get("APP_ENV") {
            Some(v) => v.parse()?,
            None => AppEnvironment::default(),
        };

        let base_url = if environment == AppEnvironment::Local {
            get("OPENAI_LOCAL_BASE_URL").unwrap_or_else(|| DEFAULT_LOCAL_BASE_URL.to_string())
        } else {
            get("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
        };

        let model_defaults = ModelConfig::default();
        let models = ModelConfig {
            chat: get("OPENAI_CHAT_MODEL").unwrap_or(model_defaults.chat),
            gen_image: get("OPENAI_GEN_IMAGE_MODEL").unwrap_or(model_defaults.gen_image),
            gen_audio: get("OPENAI_GEN_AUDIO_MODEL").unwrap_or(model_defaults.gen_audio),
            gen_audio_voice: get("OPENAI_GEN_AUDIO_VOICE")
                .unwrap_or(model_defaults.gen_audio_voice),
        };

        let temperature = match get("OPENAI_TEMPERATURE") {
            Some(v) => parse_number::<f32>("OPENAI_TEMPERATURE", &v)?,
            None => defaults.temperature,
        };
        let max_tokens = match get("OPENAI_MAX_TOKENS") {
            Some(v) => parse_number::<u32>("OPENAI_MAX_TOKENS", &v)?,
            None => defaults.max_tokens,
        };
        let port = match get("RELAY_PORT") {
            Some(v) => parse_number::<u16>("RELAY_PORT", &v)?,
            None => defaults.port,
        };

        let config = Self {
            api_key: SecretString::from(get("OPENAI_API_KEY").unwrap_or_default()),
            base_url: base_url.trim_end_matches('/').to_string(),
            assistant_id: get("OPENAI_ASSISTANT_ID"),
            models,
            temperature,
            max_tokens,
            environment,
            host: get("RELAY_HOST").unwrap_or(defaults.host),
            port,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges. The API key is checked separately by [`Self::require_api_key`].
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(RelayError::ConfigurationError(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }
        if self.max_tokens == 0 {
            return Err(RelayError::ConfigurationError(
                "max tokens must be greater than zero".to_string(),
            ));
        }
        if self.base_url.is_empty() {
            return Err(RelayError::ConfigurationError(
                "base URL must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Fail unless an API key is configured.
    pub fn require_api_key(&self) -> Result<()> {
        if self.api_key.expose_secret().trim().is_empty() {
            return Err(RelayError::MissingApiKey(
                "set OPENAI_API_KEY to reach the assistant platform".to_string(),
            ));
        }
        Ok(())
    }

    /// Address the server binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuration of the terminal chat client.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatClientConfig {
    /// Base URL of the relay server
    pub server_url: String,
}

impl Default for ChatClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
        }
    }
}

impl ChatClientConfig {
    /// Load from `RELAY_SERVER_URL`.
    pub fn from_env() -> Self {
        match std::env::var("RELAY_SERVER_URL") {
            Ok(url) if !url.trim().is_empty() => Self {
                server_url: url.trim_end_matches('/').to_string(),
            },
            _ => Self::default(),
        }
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse::<T>().map_err(|_| {
        RelayError::ConfigurationError(format!("{key} has an invalid value: {value:?}"))
    })
}
