//! Impact analysis types.

use serde::{Deserialize, Serialize};

use crate::graph::FunctionId;

/// The kind of change proposed for a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeKind {
    Rename,
    SignatureChange,
    ReturnTypeChange,
    Deletion,
    /// Implementation-only change; callers keep compiling.
    BodyOnly,
}

impl ChangeKind {
    /// Whether direct callers would break rather than merely be affected.
    pub fn is_signature_incompatible(&self) -> bool {
        !matches!(self, ChangeKind::BodyOnly)
    }
}

/// Whether an effect breaks the caller or is informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectSeverity {
    WouldBreak,
    Informational,
}

/// Direct call-site effect or transitive caller effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    Direct,
    Transitive,
}

/// One affected caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactedCaller {
    pub function_id: FunctionId,
    pub file: String,
    /// Call-site line for direct effects, definition line for transitive.
    pub line: u32,
    pub kind: EffectKind,
    pub severity: EffectSeverity,
    /// 1 for direct callers, increasing along the inverse walk.
    pub depth: u32,
}

/// Qualitative severity of a change's downstream effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlastRadiusLevel {
    Minimal,
    Moderate,
    Significant,
    Severe,
}

impl BlastRadiusLevel {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Moderate => "moderate",
            Self::Significant => "significant",
            Self::Severe => "severe",
        }
    }
}

/// Result of impact analysis for one symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactResult {
    pub symbol: FunctionId,
    pub change: ChangeKind,
    pub direct: Vec<ImpactedCaller>,
    pub transitive: Vec<ImpactedCaller>,
    pub affected_entry_points: Vec<FunctionId>,
    pub affected_tests: Vec<FunctionId>,
    pub blast_radius: BlastRadiusLevel,
    /// Distinct affected functions, direct and transitive.
    pub total_affected: u32,
}
