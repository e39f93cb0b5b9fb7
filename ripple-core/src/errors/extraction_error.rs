//! Extraction errors.
//!
//! These are recorded per file and degrade quality; they never abort the
//! batch: a failing file degrades alone.

use super::error_code::{self, RippleErrorCode};

/// Errors that can occur while extracting facts from a single file.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ExtractionError {
    #[error("Parse failed in {file}: {message}")]
    ParseFailed { file: String, message: String },

    #[error("Extraction timed out after {timeout_ms}ms: {file}")]
    Timeout { file: String, timeout_ms: u64 },

    #[error("No strategy registered for language {language}: {file}")]
    UnsupportedLanguage { file: String, language: String },

    #[error("Strategy panicked in {file}: {message}")]
    StrategyPanic { file: String, message: String },
}

impl RippleErrorCode for ExtractionError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => error_code::EXTRACTION_TIMEOUT,
            _ => error_code::EXTRACTION_ERROR,
        }
    }
}
