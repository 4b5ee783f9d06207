//! Application configuration
//!
//! Configuration loaded from `.unistate.toml` or the global `config.toml`.

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration in {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("unknown log level `{0}`")]
    LogLevel(String),
}

/// Application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Log level overriding `RUST_LOG` (e.g. "info", "trace")
    #[serde(default)]
    pub log_level: Option<String>,

    /// Interval between UI redraws and input polls, in milliseconds
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,

    /// Simulated latency of the lucky request, in milliseconds
    #[serde(default = "default_lucky_delay_ms")]
    pub lucky_delay_ms: u64,

    /// Amount a successful lucky request adds
    #[serde(default = "default_lucky_step")]
    pub lucky_step: i64,

    /// Name of the store in log lines and task names
    #[serde(default = "default_store_name")]
    pub store_name: String,
}

fn default_tick_rate_ms() -> u64 {
    100
}

fn default_lucky_delay_ms() -> u64 {
    1_500
}

fn default_lucky_step() -> i64 {
    7
}

fn default_store_name() -> String {
    "counter".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: None,
            tick_rate_ms: default_tick_rate_ms(),
            lucky_delay_ms: default_lucky_delay_ms(),
            lucky_step: default_lucky_step(),
            store_name: default_store_name(),
        }
    }
}

impl AppConfig {
    /// Load config from CWD first, then the config directory, or use defaults
    ///
    /// A file that cannot be read or parsed yields the defaults together with the error,
    /// so callers can report it once logging is set up.
    pub fn load_or_default() -> (Self, Option<ConfigError>) {
        Self::resolve(crate::find_config_file().as_deref())
    }

    fn resolve(path: Option<&Path>) -> (Self, Option<ConfigError>) {
        let Some(path) = path else {
            return (Self::default(), None);
        };

        match Self::load_from(path) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Load config from a specific file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Configured log level, if any
    pub fn log_level_filter(&self) -> Result<Option<LevelFilter>, ConfigError> {
        self.log_level
            .as_deref()
            .map(|level| {
                LevelFilter::from_str(level).map_err(|_| ConfigError::LogLevel(level.to_string()))
            })
            .transpose()
    }
}
