//! Query-boundary errors.
//!
//! The only errors raised to consumers. Always structured, always carrying
//! a recovery hint — never a raw crash.

use super::error_code::{self, RippleErrorCode};

/// Recoverable errors returned by the query surface.
#[derive(Debug, Clone, thiserror::Error)]
pub enum QueryError {
    #[error("Function not found: {name}{}", file_hint(.file))]
    FunctionNotFound {
        name: String,
        file: Option<String>,
        /// Close-by names the consumer may have meant.
        suggestions: Vec<String>,
        /// Suggested remediation, e.g. "run a fresh build".
        remediation: String,
    },

    #[error("Function name is ambiguous: {name} matches {} definitions", .candidates.len())]
    AmbiguousFunction {
        name: String,
        /// Ids of the matching definitions.
        candidates: Vec<String>,
        remediation: String,
    },

    #[error("Invalid query parameter: {message}")]
    InvalidParameter { message: String, remediation: String },

    #[error("Graph not built: {remediation}")]
    GraphNotBuilt { remediation: String },
}

fn file_hint(file: &Option<String>) -> String {
    match file {
        Some(f) => format!(" in {f}"),
        None => String::new(),
    }
}

impl QueryError {
    /// The remediation hint carried by every variant.
    pub fn remediation(&self) -> &str {
        match self {
            Self::FunctionNotFound { remediation, .. }
            | Self::AmbiguousFunction { remediation, .. }
            | Self::InvalidParameter { remediation, .. }
            | Self::GraphNotBuilt { remediation } => remediation,
        }
    }
}

impl RippleErrorCode for QueryError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::FunctionNotFound { .. } => error_code::QUERY_NOT_FOUND,
            Self::AmbiguousFunction { .. } => error_code::QUERY_AMBIGUOUS,
            Self::InvalidParameter { .. } => error_code::QUERY_INVALID,
            Self::GraphNotBuilt { .. } => error_code::SNAPSHOT_NOT_BUILT,
        }
    }
}
