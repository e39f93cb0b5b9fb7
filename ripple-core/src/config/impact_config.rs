//! Impact analysis configuration.

use serde::{Deserialize, Serialize};

/// Configuration for blast-radius classification.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ImpactConfig {
    /// Entry-point count at or above which a change is `severe`. Default: 3.
    pub severe_entry_point_threshold: Option<u32>,
    /// Total caller count at or above which a change is `severe`. Default: 25.
    pub severe_caller_threshold: Option<u32>,
    /// Maximum depth of the transitive caller walk. Default: 10.
    pub transitive_depth: Option<u32>,
}

impl ImpactConfig {
    /// Returns the effective severe entry-point threshold, defaulting to 3.
    pub fn effective_severe_entry_point_threshold(&self) -> u32 {
        self.severe_entry_point_threshold.unwrap_or(3)
    }

    /// Returns the effective severe caller threshold, defaulting to 25.
    pub fn effective_severe_caller_threshold(&self) -> u32 {
        self.severe_caller_threshold.unwrap_or(25)
    }

    /// Returns the effective transitive walk depth, defaulting to 10.
    pub fn effective_transitive_depth(&self) -> u32 {
        self.transitive_depth.unwrap_or(10)
    }
}
