//! Resolution configuration.
//!
//! Confidence tiers themselves are fixed by design (see the resolver);
//! only the ambiguity floor and fallback penalty are tunable.

use serde::{Deserialize, Serialize};

/// Configuration for the call resolver.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ResolutionConfig {
    /// Lowest confidence assigned to an ambiguous global match. Default: 0.5.
    pub ambiguity_floor: Option<f32>,
    /// Confidence penalty applied when the caller's file was extracted via
    /// the regex fallback. Default: 0.03.
    pub fallback_penalty: Option<f32>,
}

impl ResolutionConfig {
    /// Returns the effective ambiguity floor, defaulting to 0.5.
    pub fn effective_ambiguity_floor(&self) -> f32 {
        self.ambiguity_floor.unwrap_or(0.5)
    }

    /// Returns the effective fallback penalty, defaulting to 0.03.
    pub fn effective_fallback_penalty(&self) -> f32 {
        self.fallback_penalty.unwrap_or(0.03)
    }
}
