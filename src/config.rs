//! Validator configuration
//!
//! Loaded from a JSON file such as:
//!
//! ```json
//! { "root_name": "client_json", "failure_mode": "warn" }
//! ```
//!
//! Both fields are optional.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::observability::{log_event, Event, Severity};

/// Root name used in error paths unless configured otherwise
pub const DEFAULT_ROOT_NAME: &str = "client_json";

/// What a [`Validator`](crate::Validator) does with a failed validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureMode {
    /// Return the error to the caller
    #[default]
    Reject,
    /// Log the error and let the caller proceed
    Warn,
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Validator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Bare name the root value renders as in error paths
    #[serde(default = "default_root_name")]
    pub root_name: String,

    /// Reject (default) or warn
    #[serde(default)]
    pub failure_mode: FailureMode,
}

fn default_root_name() -> String {
    DEFAULT_ROOT_NAME.to_string()
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            root_name: default_root_name(),
            failure_mode: FailureMode::default(),
        }
    }
}

impl ValidatorConfig {
    /// Config that logs failures instead of returning them.
    pub fn warn_only() -> Self {
        Self {
            failure_mode: FailureMode::Warn,
            ..Self::default()
        }
    }

    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config = Self::from_json_str(&content)?;

        let shown = path.display().to_string();
        log_event(
            Severity::Info,
            Event::ConfigLoaded,
            &[("path", shown.as_str()), ("root_name", config.root_name.as_str())],
        );

        Ok(config)
    }

    /// Parse configuration from a JSON document
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        let config: ValidatorConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.root_name.trim().is_empty() {
            return Err(ConfigError::Invalid("root_name must not be empty".into()));
        }
        Ok(())
    }
}
