//! Graph assembler.
//!
//! Turns the full set of per-file extractions into the initial call graph:
//! every `FunctionRecord` populated with an id, every `CallReference` still
//! unresolved. Assembly requires complete knowledge of all files — the
//! pipeline enforces the barrier before calling in.

use std::time::{SystemTime, UNIX_EPOCH};

use ripple_core::types::collections::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::extraction::FileExtraction;

use super::entry_points::{self, EntryPointRegistry};
use super::index::NameIndex;
use super::types::{
    function_id, BuildReport, CallGraph, CallReference, FunctionRecord, GraphStats,
    SCHEMA_VERSION,
};

/// Everything the rest of the pipeline needs after assembly.
pub struct AssemblyOutput {
    pub graph: CallGraph,
    pub index: NameIndex,
    /// Files whose extraction used the regex fallback; the resolver applies
    /// a confidence penalty to calls from these files.
    pub fallback_files: FxHashSet<String>,
    /// Partial report: resolution fields are filled in by the pipeline.
    pub report: BuildReport,
}

/// Assembles `FileExtraction`s into an initial `CallGraph`.
pub struct GraphAssembler {
    registry: EntryPointRegistry,
}

impl GraphAssembler {
    pub fn new(registry: EntryPointRegistry) -> Self {
        Self { registry }
    }

    pub fn assemble(&self, project_root: &str, extractions: &[FileExtraction]) -> AssemblyOutput {
        let mut functions: FxHashMap<String, FunctionRecord> = FxHashMap::default();
        let mut imports_by_file = FxHashMap::default();
        let mut files = FxHashSet::default();
        let mut fallback_files = FxHashSet::default();
        let mut errors: Vec<String> = Vec::new();

        for extraction in extractions {
            files.insert(extraction.file.clone());
            if extraction.quality.used_fallback {
                fallback_files.insert(extraction.file.clone());
            }
            errors.extend(
                extraction
                    .facts
                    .errors
                    .iter()
                    .map(|e| format!("{}: {e}", extraction.file)),
            );
            imports_by_file.insert(extraction.file.clone(), extraction.facts.imports.clone());

            let exported_names: FxHashSet<&str> = extraction
                .facts
                .exports
                .iter()
                .map(|e| e.name.as_str())
                .collect();

            for func in &extraction.facts.functions {
                let id = function_id(&extraction.file, &func.name, func.start_line);
                if functions.contains_key(&id) {
                    warn!(%id, "duplicate function id during assembly, keeping first");
                    errors.push(format!("duplicate function id: {id}"));
                    continue;
                }

                let is_exported = func.is_exported || exported_names.contains(func.name.as_str());

                // Own every call site within this function's line span.
                let calls: Vec<CallReference> = extraction
                    .facts
                    .calls
                    .iter()
                    .filter(|c| c.line >= func.start_line && c.line <= func.end_line)
                    .map(|c| CallReference {
                        caller_id: id.clone(),
                        callee_id: None,
                        callee_name: c.callee_name.clone(),
                        receiver: c.receiver.clone(),
                        file: extraction.file.clone(),
                        line: c.line,
                        column: c.column,
                        shape: c.shape,
                        resolved: false,
                        candidates: SmallVec::new(),
                        confidence: 0.0,
                        resolution: None,
                        unresolved_reason: None,
                    })
                    .collect();

                let data_access: Vec<_> = extraction
                    .facts
                    .data_access
                    .iter()
                    .filter(|a| a.line >= func.start_line && a.line <= func.end_line)
                    .cloned()
                    .collect();

                let entry_point_kind = entry_points::classify(
                    &func.name,
                    &func.decorators,
                    is_exported,
                    &self.registry,
                );

                let record = FunctionRecord {
                    id: id.clone(),
                    name: func.name.clone(),
                    qualified_name: func
                        .qualified_name
                        .clone()
                        .unwrap_or_else(|| func.name.clone()),
                    file: extraction.file.clone(),
                    language: extraction.language,
                    start_line: func.start_line,
                    end_line: func.end_line,
                    is_exported,
                    is_async: func.is_async,
                    is_constructor: func.is_constructor,
                    is_entry_point: entry_point_kind.is_some(),
                    entry_point_kind,
                    is_data_accessor: !data_access.is_empty(),
                    parameters: func.parameters.clone(),
                    return_type: func.return_type.clone(),
                    decorators: func.decorators.clone(),
                    calls,
                    called_by: Vec::new(),
                    data_access,
                };
                functions.insert(id, record);
            }
        }

        // Deterministic record order for index building; candidate lists
        // inherit it, so tie-breaking is "first file, lowest start line".
        let mut sorted: Vec<&FunctionRecord> = functions.values().collect();
        sorted.sort_by(|a, b| {
            (a.file.as_str(), a.start_line, a.name.as_str())
                .cmp(&(b.file.as_str(), b.start_line, b.name.as_str()))
        });
        let index = NameIndex::build(&sorted, imports_by_file, files);

        let entry_points: Vec<String> = sorted
            .iter()
            .filter(|r| r.is_entry_point)
            .map(|r| r.id.clone())
            .collect();
        let data_accessors: Vec<String> = sorted
            .iter()
            .filter(|r| r.is_data_accessor)
            .map(|r| r.id.clone())
            .collect();

        let total_calls: usize = functions.values().map(|f| f.calls.len()).sum();
        debug!(
            functions = functions.len(),
            calls = total_calls,
            entry_points = entry_points.len(),
            data_accessors = data_accessors.len(),
            "assembly complete"
        );

        let report = BuildReport {
            files_processed: extractions.len(),
            total_functions: functions.len(),
            total_calls,
            errors,
            ..Default::default()
        };

        let graph = CallGraph {
            schema_version: SCHEMA_VERSION.to_string(),
            built_at_ms: epoch_ms(),
            project_root: project_root.to_string(),
            functions,
            entry_points,
            data_accessors,
            stats: GraphStats::default(),
        };

        AssemblyOutput {
            graph,
            index,
            fallback_files,
            report,
        }
    }
}

fn epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
