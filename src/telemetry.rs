//! Tracing setup
//!
//! Both binaries call [`init_from_env`] before doing anything else:
//!
//! - `RELAY_LOG_LEVEL`: trace, debug, info, warn or error (default info)
//! - `RELAY_LOG_FORMAT`: text, json or json-compact (default text)
//! - `RELAY_LOG_FILE`: write to this file instead of stderr

use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::EnvFilter;

use crate::error::{RelayError, Result};

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
    /// JSON with event fields flattened into the top-level object
    JsonCompact,
}

impl FromStr for LogFormat {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "json-compact" => Ok(Self::JsonCompact),
            _ => Err(RelayError::ConfigurationError(format!(
                "Invalid log format: {s}. Valid options: text, json, json-compact"
            ))),
        }
    }
}

/// Where and how the binaries log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: tracing::Level,
    pub format: LogFormat,
    /// `None` logs to stderr
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            format: LogFormat::Text,
            file: None,
        }
    }
}

impl LogConfig {
    /// Read `RELAY_LOG_*` through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(level) = lookup("RELAY_LOG_LEVEL") {
            config.level = level.parse().map_err(|_| {
                RelayError::ConfigurationError(format!(
                    "Invalid log level: {level}. Valid options: trace, debug, info, warn, error"
                ))
            })?;
        }
        if let Some(format) = lookup("RELAY_LOG_FORMAT") {
            config.format = format.parse()?;
        }
        config.file = lookup("RELAY_LOG_FILE").map(PathBuf::from);
        Ok(config)
    }
}

fn env_filter(level: tracing::Level) -> EnvFilter {
    let level = level.as_str().to_lowercase();
    EnvFilter::new(format!("assistant_relay={level},assistant_chat={level}"))
}

fn file_writer(path: &Path) -> Result<(NonBlocking, WorkerGuard)> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path.file_name().ok_or_else(|| {
        RelayError::ConfigurationError(format!(
            "log file path has no file name: {}",
            path.display()
        ))
    })?;
    Ok(tracing_appender::non_blocking(
        tracing_appender::rolling::never(dir, file_name),
    ))
}

/// Install the global subscriber.
///
/// Keep the returned guard alive for the lifetime of the program so buffered
/// lines are flushed. If a subscriber is already installed this is a no-op.
pub fn init(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let (writer, guard) = match &config.file {
        Some(path) => file_writer(path)?,
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config.level))
        .with_writer(writer)
        .with_target(true);

    let installed = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::JsonCompact => builder.json().flatten_event(true).try_init(),
        LogFormat::Text => builder.compact().try_init(),
    };

    match installed {
        Ok(()) => Ok(Some(guard)),
        Err(_) if tracing::dispatcher::has_been_set() => Ok(None),
        Err(e) => Err(RelayError::ConfigurationError(format!(
            "Failed to initialize tracing: {e}"
        ))),
    }
}

/// [`init`] with a [`LogConfig`] read from the process environment.
pub fn init_from_env() -> Result<Option<WorkerGuard>> {
    init(&LogConfig::from_lookup(|key| std::env::var(key).ok())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_info_text_on_stderr() {
        assert_eq!(LogConfig::from_lookup(|_| None).unwrap(), LogConfig::default());
    }

    #[test]
    fn reads_level_format_and_file() {
        let config = LogConfig::from_lookup(|key| match key {
            "RELAY_LOG_LEVEL" => Some("DEBUG".to_string()),
            "RELAY_LOG_FORMAT" => Some("json-compact".to_string()),
            "RELAY_LOG_FILE" => Some("logs/relay.log".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.level, tracing::Level::DEBUG);
        assert_eq!(config.format, LogFormat::JsonCompact);
        assert_eq!(config.file, Some(PathBuf::from("logs/relay.log")));
    }

    #[test]
    fn rejects_unknown_level_and_format() {
        let err = LogConfig::from_lookup(|key| {
            (key == "RELAY_LOG_FORMAT").then(|| "yaml".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, RelayError::ConfigurationError(_)));

        let err = LogConfig::from_lookup(|key| {
            (key == "RELAY_LOG_LEVEL").then(|| "loud".to_string())
        })
        .unwrap_err();
        assert!(err.to_string().contains("loud"));
    }

    #[test]
    fn file_path_needs_a_file_name() {
        assert!(matches!(
            file_writer(Path::new("/")),
            Err(RelayError::ConfigurationError(_))
        ));
    }
}
