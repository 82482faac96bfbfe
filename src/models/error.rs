//! Error types for the volume monitor

use std::path::PathBuf;

use thiserror::Error;

/// Monitor errors
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Disk usage measurement failed for {path}: {details}")]
    Sampler { path: PathBuf, details: String },

    #[error("Unexpected disk usage output: {0}")]
    UnexpectedOutput(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Webhook returned status: {status}")]
    WebhookStatus { status: u16 },

    #[error("Check interval must be a positive number of seconds within timer range")]
    InvalidInterval,
}

impl MonitorError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MonitorError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn sampler(path: impl Into<PathBuf>, details: impl Into<String>) -> Self {
        MonitorError::Sampler {
            path: path.into(),
            details: details.into(),
        }
    }
}

impl From<config::ConfigError> for MonitorError {
    fn from(err: config::ConfigError) -> Self {
        MonitorError::Config(err.to_string())
    }
}

impl From<reqwest::Error> for MonitorError {
    fn from(err: reqwest::Error) -> Self {
        MonitorError::Network(err.to_string())
    }
}

/// Result type for monitor operations
pub type MonitorResult<T> = Result<T, MonitorError>;
