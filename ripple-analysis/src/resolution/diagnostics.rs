//! Resolution diagnostics counters.

use ripple_core::types::collections::FxHashMap;
use serde::Serialize;

use crate::graph::UnresolvedReason;

/// Per-strategy and per-reason counters from one resolution pass.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ResolutionDiagnostics {
    pub same_file: u32,
    pub import: u32,
    pub class_scoped: u32,
    pub global_unique: u32,
    pub ambiguous: u32,
    pub unresolved: FxHashMap<UnresolvedReason, u32>,
}

impl ResolutionDiagnostics {
    pub fn record_unresolved(&mut self, reason: UnresolvedReason) {
        *self.unresolved.entry(reason).or_insert(0) += 1;
    }

    pub fn resolved_total(&self) -> u32 {
        self.same_file + self.import + self.class_scoped + self.global_unique
    }

    /// Merge another pass's counters into this one.
    pub fn merge(&mut self, other: &ResolutionDiagnostics) {
        self.same_file += other.same_file;
        self.import += other.import;
        self.class_scoped += other.class_scoped;
        self.global_unique += other.global_unique;
        self.ambiguous += other.ambiguous;
        for (reason, count) in &other.unresolved {
            *self.unresolved.entry(*reason).or_insert(0) += count;
        }
    }
}
