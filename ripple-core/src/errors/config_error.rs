//! Configuration errors.

use super::error_code::{self, RippleErrorCode};

/// Errors that can occur loading `ripple.toml`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {message}")]
    ParseFailed { path: String, message: String },

    #[error("Invalid config value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

impl RippleErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        error_code::CONFIG_ERROR
    }
}
