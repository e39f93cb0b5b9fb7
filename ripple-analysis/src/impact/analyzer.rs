//! Blast-radius computation via transitive caller analysis.

use std::collections::VecDeque;

use ripple_core::config::ImpactConfig;
use ripple_core::types::collections::FxHashSet;
use tracing::debug;

use crate::graph::entry_points::EntryPointKind;
use crate::graph::{CallGraph, FunctionId};

use super::types::{
    BlastRadiusLevel, ChangeKind, EffectKind, EffectSeverity, ImpactResult, ImpactedCaller,
};

/// Read-only impact queries over one graph snapshot.
pub struct ImpactAnalyzer<'a> {
    graph: &'a CallGraph,
    config: &'a ImpactConfig,
}

impl<'a> ImpactAnalyzer<'a> {
    pub fn new(graph: &'a CallGraph, config: &'a ImpactConfig) -> Self {
        Self { graph, config }
    }

    /// Analyze the impact of changing `symbol`. Returns `None` when the id
    /// is not in the graph.
    pub fn analyze(&self, symbol: &str, change: ChangeKind) -> Option<ImpactResult> {
        let target = self.graph.get(symbol)?;

        let direct_severity = if change.is_signature_incompatible() {
            EffectSeverity::WouldBreak
        } else {
            EffectSeverity::Informational
        };

        // Direct effects: every resolved reference targeting the symbol,
        // one entry per call site.
        let mut direct: Vec<ImpactedCaller> = Vec::new();
        for caller_id in &target.called_by {
            let Some(caller) = self.graph.get(caller_id) else {
                continue;
            };
            for call in &caller.calls {
                if call.callee_id.as_deref() == Some(symbol) {
                    direct.push(ImpactedCaller {
                        function_id: caller_id.clone(),
                        file: caller.file.clone(),
                        line: call.line,
                        kind: EffectKind::Direct,
                        severity: direct_severity,
                        depth: 1,
                    });
                }
            }
        }

        // Transitive effects: inverse BFS from the direct callers, bounded.
        let max_depth = self.config.effective_transitive_depth();
        let mut visited: FxHashSet<FunctionId> = FxHashSet::default();
        visited.insert(symbol.to_string());
        for caller in &target.called_by {
            visited.insert(caller.clone());
        }

        let mut queue: VecDeque<(FunctionId, u32)> = target
            .called_by
            .iter()
            .map(|id| (id.clone(), 1))
            .collect();
        let mut transitive: Vec<ImpactedCaller> = Vec::new();

        while let Some((func_id, depth)) = queue.pop_front() {
            if depth >= max_depth {
                continue;
            }
            let Some(record) = self.graph.get(&func_id) else {
                continue;
            };
            for caller_id in &record.called_by {
                if !visited.insert(caller_id.clone()) {
                    continue;
                }
                if let Some(caller) = self.graph.get(caller_id) {
                    transitive.push(ImpactedCaller {
                        function_id: caller_id.clone(),
                        file: caller.file.clone(),
                        line: caller.start_line,
                        kind: EffectKind::Transitive,
                        severity: EffectSeverity::Informational,
                        depth: depth + 1,
                    });
                    queue.push_back((caller_id.clone(), depth + 1));
                }
            }
        }

        // Entry points and tests found anywhere in the walk.
        let affected_ids: Vec<&FunctionId> = direct
            .iter()
            .map(|c| &c.function_id)
            .chain(transitive.iter().map(|c| &c.function_id))
            .collect();

        let mut affected_entry_points: Vec<FunctionId> = Vec::new();
        let mut affected_tests: Vec<FunctionId> = Vec::new();
        let mut seen: FxHashSet<&FunctionId> = FxHashSet::default();
        for id in affected_ids {
            if !seen.insert(id) {
                continue;
            }
            if let Some(record) = self.graph.get(id) {
                if record.is_entry_point {
                    affected_entry_points.push(id.clone());
                }
                if record.entry_point_kind == Some(EntryPointKind::Test) {
                    affected_tests.push(id.clone());
                }
            }
        }
        affected_entry_points.sort();
        affected_tests.sort();

        let total_affected = seen.len() as u32;
        let blast_radius = self.classify(total_affected, affected_entry_points.len() as u32);

        debug!(
            symbol,
            total_affected,
            entry_points = affected_entry_points.len(),
            blast_radius = blast_radius.name(),
            "impact analysis complete"
        );

        Some(ImpactResult {
            symbol: symbol.to_string(),
            change,
            direct,
            transitive,
            affected_entry_points,
            affected_tests,
            blast_radius,
            total_affected,
        })
    }

    fn classify(&self, total_affected: u32, entry_point_count: u32) -> BlastRadiusLevel {
        if total_affected == 0 {
            return BlastRadiusLevel::Minimal;
        }
        if entry_point_count >= self.config.effective_severe_entry_point_threshold()
            || total_affected >= self.config.effective_severe_caller_threshold()
        {
            return BlastRadiusLevel::Severe;
        }
        if entry_point_count > 0 {
            return BlastRadiusLevel::Significant;
        }
        BlastRadiusLevel::Moderate
    }
}
