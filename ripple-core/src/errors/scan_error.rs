//! Project scanning errors.

use super::error_code::{self, RippleErrorCode};

/// Errors that can occur while walking the project root.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Project root does not exist: {0}")]
    RootNotFound(String),

    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File exceeds size limit ({size} > {limit} bytes): {path}")]
    FileTooLarge {
        path: String,
        size: u64,
        limit: u64,
    },
}

impl RippleErrorCode for ScanError {
    fn error_code(&self) -> &'static str {
        error_code::SCAN_ERROR
    }
}
