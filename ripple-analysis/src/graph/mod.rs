//! Call graph assembly.
//!
//! Consumes all per-file extraction results and builds a single addressable
//! function arena plus the name index used by the resolver. The graph is a
//! flat id-indexed mapping with edges stored as ids, so traversals
//! never follow structural references.

pub mod assembler;
pub mod entry_points;
pub mod index;
pub mod types;

pub use assembler::{AssemblyOutput, GraphAssembler};
pub use entry_points::{EntryPointKind, EntryPointRegistry};
pub use index::{ModuleTarget, NameIndex};
pub use types::{
    function_id, BuildReport, CallGraph, CallReference, FunctionId, FunctionRecord, GraphStats,
    ResolutionKind, UnresolvedReason, SCHEMA_VERSION,
};
