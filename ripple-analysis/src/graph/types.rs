//! Call graph types.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use ripple_core::types::collections::FxHashMap;

use crate::extraction::{CallShape, DataAccessFact, ParameterFact};
use crate::scanner::Language;

use super::entry_points::EntryPointKind;

/// Snapshot schema version. Bumped on incompatible layout changes.
pub const SCHEMA_VERSION: &str = "1.0";

/// Stable function identifier: `file::name::startLine`.
pub type FunctionId = String;

/// Build the id for a function defined at `start_line` in `file`.
pub fn function_id(file: &str, name: &str, start_line: u32) -> FunctionId {
    format!("{file}::{name}::{start_line}")
}

/// Which strategy resolved a call reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionKind {
    /// Exact qualified-name match in the same file.
    SameFile,
    /// Match through a resolved import path.
    Import,
    /// Receiver's class is statically known.
    ClassScoped,
    /// Unique global simple-name match.
    Global,
}

/// Why a call reference could not (or must not) be resolved.
/// Closed set: consumers distinguish "we don't know" from "untargeted by design".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnresolvedReason {
    DynamicDispatch,
    Reflection,
    Eval,
    ExternalLibrary,
    ComputedName,
    HigherOrder,
    PluginSystem,
}

impl UnresolvedReason {
    pub fn name(&self) -> &'static str {
        match self {
            Self::DynamicDispatch => "dynamic-dispatch",
            Self::Reflection => "reflection",
            Self::Eval => "eval",
            Self::ExternalLibrary => "external-library",
            Self::ComputedName => "computed-name",
            Self::HigherOrder => "higher-order",
            Self::PluginSystem => "plugin-system",
        }
    }
}

/// One call site plus its resolution state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallReference {
    pub caller_id: FunctionId,
    /// Present only once resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callee_id: Option<FunctionId>,
    /// Callee name as written in source.
    pub callee_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub shape: CallShape,
    pub resolved: bool,
    /// Candidate callee ids: empty while unresolved, exactly one when
    /// resolved, more than one when ambiguous.
    pub candidates: SmallVec<[FunctionId; 2]>,
    /// Resolution confidence in [0,1].
    pub confidence: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<ResolutionKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unresolved_reason: Option<UnresolvedReason>,
}

/// One defined function/method. Created once per build by the assembler;
/// never mutated after the graph is published.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionRecord {
    pub id: FunctionId,
    pub name: String,
    /// "ClassName.method" for members, otherwise the simple name.
    pub qualified_name: String,
    pub file: String,
    pub language: Language,
    pub start_line: u32,
    pub end_line: u32,
    pub is_exported: bool,
    pub is_async: bool,
    pub is_constructor: bool,
    pub is_entry_point: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_point_kind: Option<EntryPointKind>,
    pub is_data_accessor: bool,
    pub parameters: Vec<ParameterFact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
    pub decorators: Vec<String>,
    /// Outgoing call references, in source order.
    pub calls: Vec<CallReference>,
    /// Ids of functions with a resolved call to this one.
    pub called_by: Vec<FunctionId>,
    pub data_access: Vec<DataAccessFact>,
}

/// Summary statistics for a built graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphStats {
    pub total_files: usize,
    pub total_functions: usize,
    pub total_calls: usize,
    pub resolved_calls: usize,
    pub unresolved_calls: usize,
    /// resolved / total, 0.0 when there are no calls.
    pub resolution_rate: f32,
    pub entry_points: usize,
    pub data_accessors: usize,
}

/// The assembled call graph: a flat id-indexed arena with edges as ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallGraph {
    pub schema_version: String,
    /// Unix epoch milliseconds at build time.
    pub built_at_ms: u64,
    pub project_root: String,
    pub functions: FxHashMap<FunctionId, FunctionRecord>,
    pub entry_points: Vec<FunctionId>,
    pub data_accessors: Vec<FunctionId>,
    pub stats: GraphStats,
}

impl Default for CallGraph {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            built_at_ms: 0,
            project_root: String::new(),
            functions: FxHashMap::default(),
            entry_points: Vec::new(),
            data_accessors: Vec::new(),
            stats: GraphStats::default(),
        }
    }
}

impl CallGraph {
    pub fn get(&self, id: &str) -> Option<&FunctionRecord> {
        self.functions.get(id)
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    /// Recompute summary statistics from the arena. Called once before the
    /// graph is published; the published graph is immutable.
    pub fn recompute_stats(&mut self, total_files: usize) {
        let total_calls: usize = self.functions.values().map(|f| f.calls.len()).sum();
        let resolved_calls: usize = self
            .functions
            .values()
            .flat_map(|f| &f.calls)
            .filter(|c| c.resolved)
            .count();
        self.stats = GraphStats {
            total_files,
            total_functions: self.functions.len(),
            total_calls,
            resolved_calls,
            unresolved_calls: total_calls - resolved_calls,
            resolution_rate: if total_calls == 0 {
                0.0
            } else {
                resolved_calls as f32 / total_calls as f32
            },
            entry_points: self.entry_points.len(),
            data_accessors: self.data_accessors.len(),
        };
    }
}

/// Result of a full build, for reporting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildReport {
    pub files_processed: usize,
    pub total_functions: usize,
    pub total_calls: usize,
    pub resolved_calls: usize,
    pub resolution_rate: f32,
    pub entry_points: usize,
    pub data_accessors: usize,
    /// Per-file error strings, non-fatal.
    pub errors: Vec<String>,
    pub duration_ms: u64,
}
