//! The full build pipeline: scan → extract → assemble → resolve → publish.
//!
//! A strict barrier separates extraction from assembly: the global name
//! index requires complete knowledge of every file. Once published, the
//! graph is an immutable snapshot; a rebuild produces a new one.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use ripple_core::config::RippleConfig;
use ripple_core::errors::{PipelineError, PipelineResult};
use tracing::{debug, info};

use crate::extraction::{ExtractionRunner, StrategyRegistry};
use crate::graph::entry_points::EntryPointKind;
use crate::graph::{BuildReport, CallGraph, EntryPointRegistry, GraphAssembler};
use crate::resolution::{CallResolver, ResolutionDiagnostics};
use crate::scanner::Walker;
use crate::snapshot;

/// Everything a full build produces.
#[derive(Default)]
pub struct BuildOutput {
    pub graph: CallGraph,
    pub report: BuildReport,
    pub diagnostics: ResolutionDiagnostics,
}

/// Orchestrates a full analysis build.
pub struct AnalysisPipeline {
    config: RippleConfig,
    strategies: Arc<StrategyRegistry>,
    entry_registry: EntryPointRegistry,
}

impl AnalysisPipeline {
    pub fn new(
        config: RippleConfig,
        strategies: Arc<StrategyRegistry>,
        entry_registry: EntryPointRegistry,
    ) -> Self {
        Self {
            config,
            strategies,
            entry_registry,
        }
    }

    /// Run a full build over `root`.
    ///
    /// Per-file failures are absorbed into the result's non-fatal error
    /// list; only conditions that prevent any build at all (an unreadable
    /// root) are returned as `Err`.
    pub fn build(&self, root: &Path) -> Result<PipelineResult<BuildOutput>, PipelineError> {
        let start = Instant::now();
        info!(root = %root.display(), "build starting");

        // Scan.
        let walker = Walker::new(self.config.scanner.clone());
        let files = walker.walk(root)?;
        debug!(files = files.len(), "scan complete");

        // Extract — one parallel task per file, then the barrier.
        let runner = ExtractionRunner::new(Arc::clone(&self.strategies), self.config.extraction.clone());
        let (extractions, extraction_errors) = runner.extract_all(&files);

        // Assemble.
        let assembler = GraphAssembler::new(self.entry_registry.clone());
        let mut output = assembler.assemble(&root.display().to_string(), &extractions);

        // Resolve.
        let resolver = CallResolver::new(
            &output.index,
            &output.fallback_files,
            &self.config.resolution,
        );
        let diagnostics = resolver.resolve_all(&mut output.graph);

        // Finalize entry points: exported symbols with no known caller
        // qualify only now that caller knowledge exists. The graph has not
        // been published yet, so this is still assembly-time mutation.
        finalize_entry_points(&mut output.graph);
        output.graph.recompute_stats(extractions.len());

        let mut report = output.report;
        report.resolved_calls = output.graph.stats.resolved_calls;
        report.resolution_rate = output.graph.stats.resolution_rate;
        report.entry_points = output.graph.stats.entry_points;
        report.data_accessors = output.graph.stats.data_accessors;
        report.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            functions = output.graph.stats.total_functions,
            calls = output.graph.stats.total_calls,
            resolution_rate = output.graph.stats.resolution_rate as f64,
            duration_ms = report.duration_ms,
            "build complete"
        );

        let mut result = PipelineResult::new(BuildOutput {
            graph: output.graph,
            report,
            diagnostics,
        });
        for error in extraction_errors {
            result.add_error(error.into());
        }
        Ok(result)
    }

    /// Run a full build and persist the snapshot document.
    pub fn build_and_save(
        &self,
        root: &Path,
        snapshot_path: &Path,
    ) -> Result<PipelineResult<BuildOutput>, PipelineError> {
        let result = self.build(root)?;
        snapshot::save(&result.data.graph, snapshot_path)?;
        Ok(result)
    }
}

/// Mark exported functions nobody calls as `ExportedRoot` entry points and
/// rebuild the graph-level entry point list.
fn finalize_entry_points(graph: &mut CallGraph) {
    for record in graph.functions.values_mut() {
        if record.is_exported && record.called_by.is_empty() && !record.is_entry_point {
            record.is_entry_point = true;
            record.entry_point_kind = Some(EntryPointKind::ExportedRoot);
        }
    }

    let mut entry_points: Vec<String> = graph
        .functions
        .values()
        .filter(|r| r.is_entry_point)
        .map(|r| r.id.clone())
        .collect();
    entry_points.sort();
    graph.entry_points = entry_points;
}
