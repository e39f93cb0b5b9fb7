//! Forward and inverse BFS over the assembled graph.
//!
//! The engine borrows an immutable graph snapshot; queries never mutate it
//! and may run concurrently. Work is bounded by the visited-set and the
//! caller-supplied depth limit — no cancellation token is needed.

use std::collections::VecDeque;

use ripple_core::types::collections::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::graph::{CallGraph, FunctionId, FunctionRecord};

use super::sensitivity::SensitivityClassifier;
use super::types::*;

/// Read-only reachability queries over one graph snapshot.
pub struct ReachabilityEngine<'a> {
    graph: &'a CallGraph,
    classifier: &'a SensitivityClassifier,
}

impl<'a> ReachabilityEngine<'a> {
    pub fn new(graph: &'a CallGraph, classifier: &'a SensitivityClassifier) -> Self {
        Self { graph, classifier }
    }

    /// Forward query: all data reachable from `origin`.
    pub fn forward(&self, origin: &str, options: &ReachabilityOptions) -> ReachabilityResult {
        let Some(origin_record) = self.graph.get(origin) else {
            return empty_result(CodeLocation {
                file: String::new(),
                line: 0,
                function_id: Some(origin.to_string()),
            });
        };

        let max_depth = options.max_depth.unwrap_or(u32::MAX);
        let mut visited: FxHashSet<FunctionId> = FxHashSet::default();
        let mut reachable_access: Vec<ReachableAccess> = Vec::new();
        let mut unknown_reaches: Vec<UnknownReach> = Vec::new();
        let mut max_depth_reached = 0u32;

        // BFS frontier: (function id, path to parent, depth).
        let mut queue: VecDeque<(FunctionId, Vec<CallPathNode>, u32)> = VecDeque::new();
        queue.push_back((origin.to_string(), Vec::new(), 0));

        while let Some((func_id, path, depth)) = queue.pop_front() {
            if visited.contains(&func_id) || depth > max_depth {
                continue;
            }
            let Some(record) = self.graph.get(&func_id) else {
                continue;
            };
            visited.insert(func_id.clone());
            max_depth_reached = max_depth_reached.max(depth);

            let mut current_path = path;
            current_path.push(path_node(record));

            // Collect this function's data accesses.
            for access in &record.data_access {
                if !options.tables.is_empty() && !options.tables.contains(&access.table) {
                    continue;
                }
                reachable_access.push(ReachableAccess {
                    access: access.clone(),
                    path: current_path.clone(),
                    depth,
                });
            }

            // Expand along outgoing call edges.
            for call in &record.calls {
                if call.resolved {
                    if let Some(callee) = &call.callee_id {
                        if !visited.contains(callee) {
                            queue.push_back((callee.clone(), current_path.clone(), depth + 1));
                        }
                    }
                } else if options.include_unresolved {
                    // Ambiguous candidates are worth following; reason-tagged
                    // references surface as unknown reaches.
                    for candidate in &call.candidates {
                        if !visited.contains(candidate) {
                            queue.push_back((candidate.clone(), current_path.clone(), depth + 1));
                        }
                    }
                    if call.candidates.is_empty() {
                        unknown_reaches.push(UnknownReach {
                            from: func_id.clone(),
                            callee_name: call.callee_name.clone(),
                            line: call.line,
                            reason: call.unresolved_reason,
                            depth,
                        });
                    }
                }
            }
        }

        let result = self.build_result(
            CodeLocation {
                file: origin_record.file.clone(),
                line: origin_record.start_line,
                function_id: Some(origin.to_string()),
            },
            reachable_access,
            unknown_reaches,
            options.sensitive_only,
            max_depth_reached,
            visited.len() as u32,
        );
        debug!(
            origin,
            tables = result.tables.len(),
            visited = result.functions_visited,
            "forward reachability complete"
        );
        result
    }

    /// Inverse query: which entry points can reach this table/field?
    ///
    /// Deduplicates `(entry point, access point)` pairs, keeping one
    /// representative path per pair to bound output size.
    pub fn inverse(&self, options: &InverseOptions) -> InverseResult {
        let max_depth = options.max_depth.unwrap_or(u32::MAX);

        // Every function with a matching direct access.
        let accessors: Vec<&FunctionRecord> = self
            .graph
            .data_accessors
            .iter()
            .filter_map(|id| self.graph.get(id))
            .filter(|record| {
                record.data_access.iter().any(|a| {
                    a.table == options.table
                        && options
                            .field
                            .as_ref()
                            .map_or(true, |f| a.fields.contains(f))
                })
            })
            .collect();

        let mut access_paths: Vec<InverseAccessPath> = Vec::new();
        let mut seen_pairs: FxHashSet<(FunctionId, FunctionId)> = FxHashSet::default();
        let mut entry_points: FxHashSet<FunctionId> = FxHashSet::default();

        for accessor in &accessors {
            let Some(access_point) = accessor.data_access.iter().find(|a| {
                a.table == options.table
                    && options
                        .field
                        .as_ref()
                        .map_or(true, |f| a.fields.contains(f))
            }) else {
                continue;
            };

            // Walk incoming edges from the accessor toward entry points.
            let mut visited: FxHashSet<FunctionId> = FxHashSet::default();
            let mut queue: VecDeque<(FunctionId, Vec<CallPathNode>, u32)> = VecDeque::new();
            queue.push_back((accessor.id.clone(), Vec::new(), 0));

            while let Some((func_id, path, depth)) = queue.pop_front() {
                if visited.contains(&func_id) || depth > max_depth {
                    continue;
                }
                let Some(record) = self.graph.get(&func_id) else {
                    continue;
                };
                visited.insert(func_id.clone());

                // Accessor-to-entry order for now; reversed on record.
                let mut current_path = path;
                current_path.push(path_node(record));

                if record.is_entry_point {
                    let pair = (record.id.clone(), accessor.id.clone());
                    if seen_pairs.insert(pair) {
                        entry_points.insert(record.id.clone());
                        let mut entry_first = current_path.clone();
                        entry_first.reverse();
                        access_paths.push(InverseAccessPath {
                            entry_point: record.id.clone(),
                            access_function: accessor.id.clone(),
                            access_point: access_point.clone(),
                            path: entry_first,
                        });
                    }
                    // Entry points may themselves have callers; keep walking.
                }

                for caller in &record.called_by {
                    if !visited.contains(caller) {
                        queue.push_back((caller.clone(), current_path.clone(), depth + 1));
                    }
                }
            }
        }

        let mut entry_points: Vec<FunctionId> = entry_points.into_iter().collect();
        entry_points.sort();

        InverseResult {
            table: options.table.clone(),
            field: options.field.clone(),
            access_paths,
            entry_points,
            total_accessors: accessors.len() as u32,
        }
    }

    fn build_result(
        &self,
        origin: CodeLocation,
        reachable_access: Vec<ReachableAccess>,
        unknown_reaches: Vec<UnknownReach>,
        sensitive_only: bool,
        max_depth_reached: u32,
        functions_visited: u32,
    ) -> ReachabilityResult {
        // Group sensitive hits by table.field, keeping the first path.
        let mut sensitive_map: FxHashMap<String, SensitiveHit> = FxHashMap::default();
        for access in &reachable_access {
            for field in &access.access.fields {
                if let Some(classification) = self.classifier.classify(field) {
                    let key = format!("{}.{}", access.access.table, field);
                    let hit = sensitive_map.entry(key).or_insert_with(|| SensitiveHit {
                        table: access.access.table.clone(),
                        field: field.clone(),
                        classification,
                        path: access.path.clone(),
                        access_count: 0,
                    });
                    hit.access_count += 1;
                }
            }
        }

        let filtered: Vec<ReachableAccess> = if sensitive_only {
            reachable_access
                .into_iter()
                .filter(|a| {
                    a.access
                        .fields
                        .iter()
                        .any(|f| self.classifier.classify(f).is_some())
                })
                .collect()
        } else {
            reachable_access
        };

        let mut tables: Vec<String> = Vec::new();
        let mut fields: Vec<String> = Vec::new();
        for access in &filtered {
            tables.push(access.access.table.clone());
            for field in &access.access.fields {
                fields.push(format!("{}.{}", access.access.table, field));
            }
        }
        tables.sort();
        tables.dedup();
        fields.sort();
        fields.dedup();

        let mut sensitive: Vec<SensitiveHit> = sensitive_map.into_values().collect();
        sensitive.sort_by(|a, b| (&a.table, &a.field).cmp(&(&b.table, &b.field)));

        ReachabilityResult {
            origin,
            reachable_access: filtered,
            tables,
            fields,
            sensitive,
            unknown_reaches,
            max_depth_reached,
            functions_visited,
        }
    }
}

fn path_node(record: &FunctionRecord) -> CallPathNode {
    CallPathNode {
        function_id: record.id.clone(),
        function_name: record.qualified_name.clone(),
        file: record.file.clone(),
        line: record.start_line,
    }
}

fn empty_result(origin: CodeLocation) -> ReachabilityResult {
    ReachabilityResult {
        origin,
        reachable_access: Vec::new(),
        tables: Vec::new(),
        fields: Vec::new(),
        sensitive: Vec::new(),
        unknown_reaches: Vec::new(),
        max_depth_reached: 0,
        functions_visited: 0,
    }
}
