//! Query surface tests: pagination, summaries, structured errors.

mod common;

use std::sync::Arc;

use common::GraphBuilder;
use ripple_analysis::extraction::DataOperation;
use ripple_analysis::impact::ChangeKind;
use ripple_analysis::query::QueryService;
use ripple_analysis::reachability::SensitivityClassifier;
use ripple_analysis::snapshot;
use ripple_core::config::ImpactConfig;
use ripple_core::errors::{QueryError, RippleErrorCode, SnapshotError};

fn service(builder: GraphBuilder) -> QueryService {
    QueryService::new(
        Arc::new(builder.build()),
        SensitivityClassifier::default(),
        ImpactConfig::default(),
    )
}

fn caller_fixture() -> GraphBuilder {
    let mut b = GraphBuilder::new();
    b.function("x.ts", "target", 1);
    for i in 0..7u32 {
        let id = format!("x.ts::caller{}::{}", i, i * 10 + 100);
        b.function("x.ts", &format!("caller{i}"), i * 10 + 100);
        b.edge(&id, "x.ts::target::1");
    }
    b
}

#[test]
fn list_callers_paginates_and_summarizes() {
    let service = service(caller_fixture());

    let first = service.list_callers("target", None, 0, 3).unwrap();
    assert_eq!(first.result.items.len(), 3);
    assert_eq!(first.result.total, 7);
    assert!(first.result.has_more);
    assert!(first.summary.contains("7 direct callers"));
    assert!(!first.follow_ups.is_empty());

    let last = service.list_callers("target", None, 6, 3).unwrap();
    assert_eq!(last.result.items.len(), 1);
    assert!(!last.result.has_more);
}

#[test]
fn unknown_function_gets_suggestions_and_remediation() {
    let service = service(caller_fixture());

    let err = service.list_callers("tagret", None, 0, 10).unwrap_err();
    match &err {
        QueryError::FunctionNotFound {
            suggestions,
            remediation,
            ..
        } => {
            // No close names for this typo; remediation still present.
            assert!(suggestions.is_empty());
            assert!(remediation.contains("build"));
        }
        other => panic!("expected FunctionNotFound, got {other:?}"),
    }
    assert_eq!(err.error_code(), "RIPPLE_QUERY_NOT_FOUND");
}

#[test]
fn partial_names_suggest_candidates() {
    let service = service(caller_fixture());

    let err = service.list_callers("caller", None, 0, 10).unwrap_err();
    match err {
        QueryError::FunctionNotFound { suggestions, .. } => {
            assert!(!suggestions.is_empty());
            assert!(suggestions.len() <= 5);
        }
        other => panic!("expected FunctionNotFound, got {other:?}"),
    }
}

#[test]
fn duplicate_names_require_a_file_hint() {
    let mut b = GraphBuilder::new();
    b.function("a.ts", "save", 1);
    b.function("b.ts", "save", 1);
    let service = service(b);

    let err = service.list_callers("save", None, 0, 10).unwrap_err();
    assert!(matches!(err, QueryError::AmbiguousFunction { .. }));

    // Scoped by file, the same name resolves.
    let ok = service.list_callers("save", Some("a.ts"), 0, 10).unwrap();
    assert_eq!(ok.result.total, 0);
}

#[test]
fn full_ids_bypass_name_lookup() {
    let service = service(caller_fixture());
    let ok = service.list_callers("x.ts::target::1", None, 0, 10).unwrap();
    assert_eq!(ok.result.total, 7);
}

#[test]
fn zero_limit_is_an_invalid_parameter() {
    let service = service(caller_fixture());
    let err = service.list_callers("target", None, 0, 0).unwrap_err();
    assert!(matches!(err, QueryError::InvalidParameter { .. }));
    assert!(!err.remediation().is_empty());
}

#[test]
fn reachability_query_reports_tables() {
    let mut b = GraphBuilder::new();
    b.function("api.ts", "handler", 1);
    b.function("repo.ts", "load", 1);
    b.edge("api.ts::handler::1", "repo.ts::load::1");
    b.data_access("repo.ts::load::1", "users", &["email"], DataOperation::Read);
    let service = service(b);

    let response = service
        .reachability_from("handler", None, None, 0, 50)
        .unwrap();
    assert_eq!(response.result.tables, vec!["users".to_string()]);
    assert!(response.summary.contains("reaches 1 table"));
    assert!(response
        .follow_ups
        .iter()
        .any(|f| f.contains("users")));
}

#[test]
fn impact_query_reports_blast_radius() {
    let mut b = GraphBuilder::new();
    b.function("x.ts", "target", 1);
    b.function("api.ts", "handler", 1);
    b.edge("api.ts::handler::1", "x.ts::target::1");
    b.entry_point("api.ts::handler::1");
    let service = service(b);

    let response = service
        .impact_of("target", None, ChangeKind::SignatureChange, 0, 50)
        .unwrap();
    assert!(response.summary.contains("significant"));
    assert_eq!(response.result.affected.total, 1);
    assert_eq!(response.result.full.affected_entry_points.len(), 1);
}

#[test]
fn service_loads_from_persisted_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("graph.json");

    let mut b = GraphBuilder::new();
    b.function("x.ts", "target", 1);
    b.function("x.ts", "caller", 20);
    b.edge("x.ts::caller::20", "x.ts::target::1");
    snapshot::save(&b.build(), &path).unwrap();

    let service = QueryService::from_snapshot(
        &path,
        SensitivityClassifier::default(),
        ImpactConfig::default(),
    )
    .unwrap();
    let response = service.list_callers("target", None, 0, 10).unwrap();
    assert_eq!(response.result.total, 1);
}

#[test]
fn missing_snapshot_is_graph_not_built() {
    let dir = tempfile::tempdir().unwrap();
    let err = QueryService::from_snapshot(
        &dir.path().join("graph.json"),
        SensitivityClassifier::default(),
        ImpactConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, SnapshotError::NotBuilt { .. }));
    assert_eq!(err.error_code(), "RIPPLE_SNAPSHOT_NOT_BUILT");
}
