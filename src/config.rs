//! Application configuration.
//!
//! The configuration is loaded from `$XDG_CONFIG_HOME/wkswitch/config.json`.
//! A missing file is not an error; the compiled-in defaults reproduce the
//! behaviour of running without one.
//!
//! # Example
//!
//! ```json
//! {
//!   "settle_delay_ms": 150,
//!   "log_file": "/tmp/i3-wk-switcher.log",
//!   "log_level": "debug"
//! }
//! ```

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level configuration.
///
/// Every field is optional; a minimal `{}` file is valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pause before the final `focus output` of a swap (ms).
    pub settle_delay_ms: u64,
    /// File the log is appended to.
    pub log_file: PathBuf,
    /// Minimum level written to the log file: `off`, `error`, `warn`,
    /// `info`, `debug` or `trace`.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settle_delay_ms: crate::switcher::SETTLE_DELAY.as_millis() as u64,
            log_file: std::env::temp_dir().join("i3-wk-switcher.log"),
            log_level: "debug".into(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        config.level_filter()?;
        Ok(config)
    }

    /// Default location, `$XDG_CONFIG_HOME/wkswitch/config.json`.
    pub fn default_path() -> PathBuf {
        let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
            format!("{}/.config", home)
        });
        PathBuf::from(base).join("wkswitch").join("config.json")
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        self.log_level
            .parse()
            .map_err(|_| ConfigError::InvalidLevel(self.log_level.clone()))
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("invalid log_level: {0:?}")]
    InvalidLevel(String),
}

impl ConfigError {
    /// True when there simply is no config file, as opposed to a broken one.
    pub fn is_missing(&self) -> bool {
        matches!(self, ConfigError::Read { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}
