//! The query service.

use std::path::Path;
use std::sync::Arc;

use ripple_core::config::ImpactConfig;
use ripple_core::errors::{QueryError, SnapshotError};
use tracing::debug;

use crate::graph::{CallGraph, FunctionRecord};
use crate::impact::{ChangeKind, ImpactAnalyzer, ImpactResult, ImpactedCaller};
use crate::reachability::{
    ReachabilityEngine, ReachabilityOptions, ReachabilityResult, ReachableAccess,
    SensitivityClassifier,
};
use crate::snapshot;

use super::types::{CallerEntry, Page, QueryResponse};

const MAX_LIMIT: usize = 500;

/// Read-only operations over one immutable graph snapshot.
///
/// A rebuild produces a new snapshot and a new service; in-flight queries
/// keep the `Arc` they started with.
#[derive(Debug)]
pub struct QueryService {
    graph: Arc<CallGraph>,
    classifier: SensitivityClassifier,
    impact_config: ImpactConfig,
}

impl QueryService {
    pub fn new(
        graph: Arc<CallGraph>,
        classifier: SensitivityClassifier,
        impact_config: ImpactConfig,
    ) -> Self {
        Self {
            graph,
            classifier,
            impact_config,
        }
    }

    /// Load the persisted snapshot and serve queries against it.
    pub fn from_snapshot(
        path: &Path,
        classifier: SensitivityClassifier,
        impact_config: ImpactConfig,
    ) -> Result<Self, SnapshotError> {
        let graph = snapshot::load(path)?;
        Ok(Self::new(Arc::new(graph), classifier, impact_config))
    }

    pub fn graph(&self) -> &CallGraph {
        &self.graph
    }

    /// List every known caller of a function.
    pub fn list_callers(
        &self,
        name: &str,
        file: Option<&str>,
        offset: usize,
        limit: usize,
    ) -> Result<QueryResponse<Page<CallerEntry>>, QueryError> {
        let limit = validate_limit(limit)?;
        let record = self.locate(name, file)?;

        let callers: Vec<CallerEntry> = record
            .called_by
            .iter()
            .filter_map(|id| self.graph.get(id))
            .map(|caller| CallerEntry {
                function_id: caller.id.clone(),
                name: caller.qualified_name.clone(),
                file: caller.file.clone(),
                line: caller.start_line,
            })
            .collect();

        let total = callers.len();
        let summary = format!(
            "{} has {} direct caller{}",
            record.qualified_name,
            total,
            plural(total)
        );
        let follow_ups = vec![
            format!("impact of changing {}", record.name),
            format!("reachability from {}", record.name),
        ];
        debug!(function = %record.id, callers = total, "list_callers");

        Ok(QueryResponse {
            result: Page::from_items(callers, offset, limit),
            summary,
            follow_ups,
        })
    }

    /// Forward reachability from a function.
    pub fn reachability_from(
        &self,
        name: &str,
        file: Option<&str>,
        max_depth: Option<u32>,
        offset: usize,
        limit: usize,
    ) -> Result<QueryResponse<ReachabilityPage>, QueryError> {
        let limit = validate_limit(limit)?;
        let record = self.locate(name, file)?;

        let engine = ReachabilityEngine::new(&self.graph, &self.classifier);
        let options = ReachabilityOptions {
            max_depth,
            ..Default::default()
        };
        let result = engine.forward(&record.id, &options);

        let summary = format!(
            "{} reaches {} table{} through {} function{}",
            record.qualified_name,
            result.tables.len(),
            plural(result.tables.len()),
            result.functions_visited,
            plural(result.functions_visited as usize)
        );
        let follow_ups = result
            .tables
            .iter()
            .take(3)
            .map(|t| format!("who can reach table {t}"))
            .collect();

        let tables = result.tables.clone();
        let accesses = Page::from_items(result.reachable_access.clone(), offset, limit);
        Ok(QueryResponse {
            result: ReachabilityPage {
                origin: record.id.clone(),
                tables,
                accesses,
                full: result,
            },
            summary,
            follow_ups,
        })
    }

    /// Impact of changing a function.
    pub fn impact_of(
        &self,
        name: &str,
        file: Option<&str>,
        change: ChangeKind,
        offset: usize,
        limit: usize,
    ) -> Result<QueryResponse<ImpactPage>, QueryError> {
        let limit = validate_limit(limit)?;
        let record = self.locate(name, file)?;

        let analyzer = ImpactAnalyzer::new(&self.graph, &self.impact_config);
        let result = analyzer
            .analyze(&record.id, change)
            .ok_or_else(|| not_found(name, file, &self.graph))?;

        let summary = format!(
            "changing {} affects {} function{} ({} entry point{}) — blast radius {}",
            record.qualified_name,
            result.total_affected,
            plural(result.total_affected as usize),
            result.affected_entry_points.len(),
            plural(result.affected_entry_points.len()),
            result.blast_radius.name()
        );
        let follow_ups = vec![
            format!("list callers of {}", record.name),
            format!("reachability from {}", record.name),
        ];

        let mut affected: Vec<ImpactedCaller> = result.direct.clone();
        affected.extend(result.transitive.iter().cloned());
        let affected = Page::from_items(affected, offset, limit);

        Ok(QueryResponse {
            result: ImpactPage {
                symbol: record.id.clone(),
                affected,
                full: result,
            },
            summary,
            follow_ups,
        })
    }

    /// Find a function by simple name, qualified name, or full id, with an
    /// optional file filter.
    fn locate(&self, name: &str, file: Option<&str>) -> Result<&FunctionRecord, QueryError> {
        if let Some(record) = self.graph.get(name) {
            return Ok(record);
        }

        let mut matches: Vec<&FunctionRecord> = self
            .graph
            .functions
            .values()
            .filter(|r| r.name == name || r.qualified_name == name)
            .filter(|r| file.map_or(true, |f| r.file == f))
            .collect();
        matches.sort_by(|a, b| (&a.file, a.start_line).cmp(&(&b.file, b.start_line)));

        match matches.len() {
            0 => Err(not_found(name, file, &self.graph)),
            1 => Ok(matches[0]),
            _ => Err(QueryError::AmbiguousFunction {
                name: name.to_string(),
                candidates: matches.iter().map(|r| r.id.clone()).collect(),
                remediation: "pass the defining file to disambiguate".to_string(),
            }),
        }
    }
}

/// Reachability result with a paginated access list.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ReachabilityPage {
    pub origin: String,
    pub tables: Vec<String>,
    pub accesses: Page<ReachableAccess>,
    /// The unpaginated result for consumers that need paths or sensitivity.
    pub full: ReachabilityResult,
}

/// Impact result with a paginated affected list.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ImpactPage {
    pub symbol: String,
    pub affected: Page<ImpactedCaller>,
    pub full: ImpactResult,
}

fn validate_limit(limit: usize) -> Result<usize, QueryError> {
    if limit == 0 {
        return Err(QueryError::InvalidParameter {
            message: "limit must be at least 1".to_string(),
            remediation: "pass a limit between 1 and 500".to_string(),
        });
    }
    Ok(limit.min(MAX_LIMIT))
}

fn not_found(name: &str, file: Option<&str>, graph: &CallGraph) -> QueryError {
    // Close-by names: case-insensitive substring matches, bounded.
    let needle = name.to_lowercase();
    let mut suggestions: Vec<String> = graph
        .functions
        .values()
        .filter(|r| r.name.to_lowercase().contains(&needle))
        .map(|r| r.qualified_name.clone())
        .collect();
    suggestions.sort();
    suggestions.dedup();
    suggestions.truncate(5);

    let remediation = if suggestions.is_empty() {
        "check the spelling or run a fresh build".to_string()
    } else {
        "did you mean one of the suggested names? otherwise run a fresh build".to_string()
    };

    QueryError::FunctionNotFound {
        name: name.to_string(),
        file: file.map(|f| f.to_string()),
        suggestions,
        remediation,
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
