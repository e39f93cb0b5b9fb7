//! Extraction configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the hybrid extraction layer.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Per-file parse timeout in milliseconds. Default: 5000.
    pub parse_timeout_ms: Option<u64>,
    /// Byte length above which a file with zero extracted items is treated
    /// as a poor-coverage parse and re-run through the fallback. Default: 256.
    pub poor_coverage_min_bytes: Option<usize>,
}

impl ExtractionConfig {
    /// Returns the effective parse timeout, defaulting to 5000ms.
    pub fn effective_parse_timeout_ms(&self) -> u64 {
        self.parse_timeout_ms.unwrap_or(5000)
    }

    /// Returns the effective poor-coverage threshold, defaulting to 256 bytes.
    pub fn effective_poor_coverage_min_bytes(&self) -> usize {
        self.poor_coverage_min_bytes.unwrap_or(256)
    }
}
