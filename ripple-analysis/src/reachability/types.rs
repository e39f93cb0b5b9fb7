//! Reachability types.

use serde::{Deserialize, Serialize};

use crate::extraction::DataAccessFact;
use crate::graph::{FunctionId, UnresolvedReason};

use super::sensitivity::SensitivityClass;

/// Code location of a query origin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeLocation {
    pub file: String,
    pub line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_id: Option<FunctionId>,
}

/// One node in a reconstructed call path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallPathNode {
    pub function_id: FunctionId,
    pub function_name: String,
    pub file: String,
    pub line: u32,
}

/// A data access reached by a forward query, with the path taken.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReachableAccess {
    pub access: DataAccessFact,
    /// Root-to-leaf path, origin first. Never repeats a function id.
    pub path: Vec<CallPathNode>,
    pub depth: u32,
}

/// An unresolved edge encountered at the traversal frontier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnknownReach {
    pub from: FunctionId,
    pub callee_name: String,
    pub line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<UnresolvedReason>,
    pub depth: u32,
}

/// A sensitive field reached by a forward query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitiveHit {
    pub table: String,
    pub field: String,
    pub classification: SensitivityClass,
    /// Representative path (first found).
    pub path: Vec<CallPathNode>,
    pub access_count: u32,
}

/// Forward query options.
#[derive(Debug, Clone, Default)]
pub struct ReachabilityOptions {
    /// Maximum traversal depth. `None` means unlimited.
    pub max_depth: Option<u32>,
    /// Keep only accesses touching at least one sensitive field.
    pub sensitive_only: bool,
    /// Restrict to these tables; empty means all.
    pub tables: Vec<String>,
    /// Follow ambiguous candidates and report unresolved edges as
    /// `UnknownReach` instead of skipping them.
    pub include_unresolved: bool,
}

/// Result of a forward reachability query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReachabilityResult {
    pub origin: CodeLocation,
    pub reachable_access: Vec<ReachableAccess>,
    /// Distinct tables reached, sorted.
    pub tables: Vec<String>,
    /// Distinct `table.field` pairs reached, sorted.
    pub fields: Vec<String>,
    pub sensitive: Vec<SensitiveHit>,
    pub unknown_reaches: Vec<UnknownReach>,
    /// Maximum depth actually reached.
    pub max_depth_reached: u32,
    /// Count of distinct functions visited.
    pub functions_visited: u32,
}

/// Inverse query options: who can reach this table (and field)?
#[derive(Debug, Clone)]
pub struct InverseOptions {
    pub table: String,
    pub field: Option<String>,
    pub max_depth: Option<u32>,
}

/// One entry point's path to one access point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InverseAccessPath {
    pub entry_point: FunctionId,
    pub access_function: FunctionId,
    pub access_point: DataAccessFact,
    /// Representative path, entry point first.
    pub path: Vec<CallPathNode>,
}

/// Result of an inverse reachability query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InverseResult {
    pub table: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// One representative path per `(entry point, access point)` pair.
    pub access_paths: Vec<InverseAccessPath>,
    /// Distinct entry points that can reach the target, sorted.
    pub entry_points: Vec<FunctionId>,
    pub total_accessors: u32,
}
