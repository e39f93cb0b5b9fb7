//! Impact analysis.
//!
//! Built on the graph's reverse edges: given a proposed change to a symbol,
//! computes direct and transitive callers, affected entry points and tests,
//! and a blast-radius classification.

pub mod analyzer;
pub mod types;

pub use analyzer::ImpactAnalyzer;
pub use types::{
    BlastRadiusLevel, ChangeKind, EffectKind, EffectSeverity, ImpactResult, ImpactedCaller,
};
