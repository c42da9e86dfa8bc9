//! Configuration handed to the inventory layer by its host.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use ansiblereg_observability::{LogFormat, LogSettings};

/// Root directory for inventories.
pub const PATH_ENV: &str = "INVENTORY_PATH";
/// Include file/line of the log call site.
pub const LOG_CALLER_ENV: &str = "ANSIBLEREG_LOG_CALLER";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing configuration value: {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Directory where inventory directories are created.
    pub path: PathBuf,
    #[serde(default)]
    pub log_caller: bool,
}

impl ProviderConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            log_caller: false,
        }
    }

    /// Read `INVENTORY_PATH` and `ANSIBLEREG_LOG_CALLER` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (environment, test fixtures, ...).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = lookup(PATH_ENV)
            .filter(|p| !p.trim().is_empty())
            .ok_or(ConfigError::Missing(PATH_ENV))?;

        let log_caller = match lookup(LOG_CALLER_ENV) {
            None => false,
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::Invalid {
                key: LOG_CALLER_ENV,
                value: raw,
            })?,
        };

        Ok(Self {
            path: PathBuf::from(path),
            log_caller,
        })
    }

    /// Logging settings for a plugin process: plain stderr output, caller
    /// location as configured.
    pub fn log_settings(&self) -> LogSettings {
        LogSettings {
            level: None,
            log_caller: self.log_caller,
            format: LogFormat::Plain,
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
