//! Persisted-snapshot errors.
//!
//! Absence or corruption of the snapshot is a distinct "graph not built"
//! condition — the system never serves a partial or reconstructed graph.

use super::error_code::{self, RippleErrorCode};

/// Errors that can occur loading or saving the persisted graph document.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("No graph snapshot at {path} — run a full build first")]
    NotBuilt { path: String },

    #[error("Snapshot schema mismatch: found {found:?}, expected {expected} — rebuild required")]
    SchemaMismatch { found: Option<String>, expected: String },

    #[error("Snapshot at {path} is corrupt: {message} — rebuild required")]
    Corrupt { path: String, message: String },

    #[error("Snapshot I/O failed at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl RippleErrorCode for SnapshotError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotBuilt { .. } => error_code::SNAPSHOT_NOT_BUILT,
            Self::SchemaMismatch { .. } => error_code::SNAPSHOT_SCHEMA_MISMATCH,
            Self::Corrupt { .. } => error_code::SNAPSHOT_CORRUPT,
            Self::Io { .. } => error_code::SNAPSHOT_IO,
        }
    }
}
