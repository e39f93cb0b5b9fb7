//! Persisted graph snapshot.
//!
//! A versioned JSON document written after a full build and read at query
//! time. A missing or corrupt document is an explicit "graph not built"
//! condition — a partial graph is never served.

use std::path::Path;

use ripple_core::errors::SnapshotError;
use tracing::{debug, warn};

use crate::graph::{CallGraph, SCHEMA_VERSION};

/// Write the graph snapshot atomically (temp file + rename).
pub fn save(graph: &CallGraph, path: &Path) -> Result<(), SnapshotError> {
    let json = serde_json::to_vec_pretty(graph).map_err(|e| SnapshotError::Corrupt {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, &json).map_err(|source| SnapshotError::Io {
        path: tmp.display().to_string(),
        source,
    })?;
    std::fs::rename(&tmp, path).map_err(|source| SnapshotError::Io {
        path: path.display().to_string(),
        source,
    })?;

    debug!(path = %path.display(), bytes = json.len(), "snapshot saved");
    Ok(())
}

/// Load a graph snapshot, verifying the schema version.
pub fn load(path: &Path) -> Result<CallGraph, SnapshotError> {
    if !path.exists() {
        return Err(SnapshotError::NotBuilt {
            path: path.display().to_string(),
        });
    }

    let bytes = std::fs::read(path).map_err(|source| SnapshotError::Io {
        path: path.display().to_string(),
        source,
    })?;

    // Check the schema tag before committing to the full deserialization,
    // so a version mismatch is reported as such rather than as corruption.
    let probe: serde_json::Value =
        serde_json::from_slice(&bytes).map_err(|e| SnapshotError::Corrupt {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
    let found = probe
        .get("schema_version")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());
    if found.as_deref() != Some(SCHEMA_VERSION) {
        warn!(?found, expected = SCHEMA_VERSION, "snapshot schema mismatch");
        return Err(SnapshotError::SchemaMismatch {
            found,
            expected: SCHEMA_VERSION.to_string(),
        });
    }

    serde_json::from_slice(&bytes).map_err(|e| SnapshotError::Corrupt {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
