//! Graph assembly and resolution errors.

use super::error_code::{self, RippleErrorCode};

/// Errors that can occur during graph assembly or call resolution.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Duplicate function id during assembly: {0}")]
    DuplicateId(String),

    #[error("Reference to unknown function id: {0}")]
    UnknownId(String),

    #[error("Back-reference merge failed for {id}: {message}")]
    BackReferenceMerge { id: String, message: String },
}

impl RippleErrorCode for GraphError {
    fn error_code(&self) -> &'static str {
        error_code::GRAPH_ERROR
    }
}
