//! Resolver strategy and confidence tier tests.

mod common;

use common::DirectiveStrategy;
use ripple_analysis::extraction::{
    ExtractionQuality, ExtractionStrategy, FileExtraction, StrategyKind,
};
use ripple_analysis::graph::{
    CallGraph, EntryPointRegistry, GraphAssembler, ResolutionKind, UnresolvedReason,
};
use ripple_analysis::resolution::CallResolver;
use ripple_analysis::scanner::Language;
use ripple_core::config::ResolutionConfig;
use ripple_core::types::collections::FxHashSet;

fn extraction(file: &str, text: &str, used_fallback: bool) -> FileExtraction {
    let strategy = DirectiveStrategy::structural();
    let facts = strategy.extract(file, text).unwrap();
    FileExtraction {
        file: file.to_string(),
        language: Language::TypeScript,
        content_hash: 0,
        quality: ExtractionQuality {
            strategy: if used_fallback {
                StrategyKind::Regex
            } else {
                StrategyKind::Structural
            },
            coverage: 0.9,
            parse_error_count: 0,
            item_count: facts.item_count(),
            used_fallback,
            elapsed_us: 1,
        },
        facts,
    }
}

fn resolve_files(files: &[(&str, &str)]) -> CallGraph {
    resolve_files_with(files, &[])
}

fn resolve_files_with(files: &[(&str, &str)], fallback: &[&str]) -> CallGraph {
    let extractions: Vec<FileExtraction> = files
        .iter()
        .map(|(file, text)| extraction(file, text, fallback.contains(file)))
        .collect();

    let assembler = GraphAssembler::new(EntryPointRegistry::new());
    let mut output = assembler.assemble("/test", &extractions);

    let config = ResolutionConfig::default();
    let resolver = CallResolver::new(&output.index, &output.fallback_files, &config);
    resolver.resolve_all(&mut output.graph);
    output.graph
}

fn first_call<'a>(graph: &'a CallGraph, id: &str) -> &'a ripple_analysis::graph::CallReference {
    &graph.get(id).unwrap().calls[0]
}

#[test]
fn same_file_match_gets_the_top_tier() {
    let graph = resolve_files(&[("a.ts", "fn caller\ncall helper\nfn helper\n")]);
    let reference = first_call(&graph, "a.ts::caller::1");

    assert!(reference.resolved);
    assert_eq!(reference.resolution, Some(ResolutionKind::SameFile));
    assert_eq!(reference.callee_id.as_deref(), Some("a.ts::helper::3"));
    assert!(reference.confidence >= 0.9);
}

#[test]
fn import_match_resolves_across_files() {
    let graph = resolve_files(&[
        ("a.ts", "import ./lib named=work\nfn caller\ncall work\n"),
        ("lib.ts", "fn work exported\n"),
    ]);
    let reference = first_call(&graph, "a.ts::caller::2");

    assert!(reference.resolved);
    assert_eq!(reference.resolution, Some(ResolutionKind::Import));
    assert_eq!(reference.callee_id.as_deref(), Some("lib.ts::work::1"));
    assert!(reference.confidence >= 0.9);
}

#[test]
fn qualified_call_names_use_the_qualified_index() {
    let graph = resolve_files(&[
        ("a.ts", "fn caller\ncall UserService.find\n"),
        ("svc.ts", "fn find class=UserService\n"),
    ]);
    let reference = first_call(&graph, "a.ts::caller::1");

    assert!(reference.resolved);
    assert_eq!(reference.callee_id.as_deref(), Some("svc.ts::find::1"));
    assert!(reference.confidence >= 0.9);
}

#[test]
fn namespace_import_resolves_via_receiver() {
    let graph = resolve_files(&[
        ("a.ts", "import ./lib ns=lib\nfn caller\ncall work recv=lib\n"),
        ("lib.ts", "fn work exported\n"),
    ]);
    let reference = first_call(&graph, "a.ts::caller::2");

    assert!(reference.resolved);
    assert_eq!(reference.resolution, Some(ResolutionKind::Import));
}

#[test]
fn this_receiver_uses_the_enclosing_class() {
    let graph = resolve_files(&[(
        "svc.ts",
        "fn find class=UserService\ncall save recv=this\nfn save class=UserService\n",
    )]);
    let reference = first_call(&graph, "svc.ts::find::1");

    assert!(reference.resolved);
    assert_eq!(reference.resolution, Some(ResolutionKind::ClassScoped));
    assert_eq!(reference.callee_id.as_deref(), Some("svc.ts::save::3"));
    assert!((0.75..=0.9).contains(&reference.confidence));
}

#[test]
fn typed_parameter_receiver_is_class_scoped() {
    let graph = resolve_files(&[
        (
            "a.ts",
            "fn caller params=repo:UserRepo\ncall fetch recv=repo\n",
        ),
        ("repo.ts", "fn fetch class=UserRepo\n"),
    ]);
    let reference = first_call(&graph, "a.ts::caller::1");

    assert!(reference.resolved);
    assert_eq!(reference.resolution, Some(ResolutionKind::ClassScoped));
    assert_eq!(reference.callee_id.as_deref(), Some("repo.ts::fetch::1"));
    assert!((0.75..=0.9).contains(&reference.confidence));
}

#[test]
fn class_name_receiver_is_class_scoped() {
    let graph = resolve_files(&[
        ("a.ts", "fn caller\ncall create recv=Factory\n"),
        ("factory.ts", "fn create class=Factory\n"),
    ]);
    let reference = first_call(&graph, "a.ts::caller::1");

    assert!(reference.resolved);
    assert_eq!(reference.resolution, Some(ResolutionKind::ClassScoped));
    assert!((0.75..=0.9).contains(&reference.confidence));
}

#[test]
fn unique_global_match_gets_the_low_tier() {
    let graph = resolve_files(&[
        ("a.ts", "fn caller\ncall lonely\n"),
        ("b.ts", "fn lonely\n"),
    ]);
    let reference = first_call(&graph, "a.ts::caller::1");

    assert!(reference.resolved);
    assert_eq!(reference.resolution, Some(ResolutionKind::Global));
    assert!((0.5..=0.7).contains(&reference.confidence));
}

#[test]
fn ambiguous_global_match_records_all_candidates() {
    let graph = resolve_files(&[
        ("a.ts", "fn caller\ncall shared\n"),
        ("b.ts", "fn shared\n"),
        ("c.ts", "fn shared\n"),
        ("d.ts", "fn shared\n"),
    ]);
    let reference = first_call(&graph, "a.ts::caller::1");

    assert!(!reference.resolved);
    assert!(reference.callee_id.is_none());
    assert_eq!(reference.candidates.len(), 3);
    // Confidence shrinks with candidate count but stays in the global band.
    assert!((0.5..0.7).contains(&reference.confidence));
    assert!(reference.unresolved_reason.is_none());
}

#[test]
fn more_candidates_means_less_confidence() {
    let two = resolve_files(&[
        ("a.ts", "fn caller\ncall shared\n"),
        ("b.ts", "fn shared\n"),
        ("c.ts", "fn shared\n"),
    ]);
    let five = resolve_files(&[
        ("a.ts", "fn caller\ncall shared\n"),
        ("b.ts", "fn shared\n"),
        ("c.ts", "fn shared\n"),
        ("d.ts", "fn shared\n"),
        ("e.ts", "fn shared\n"),
        ("f.ts", "fn shared\n"),
    ]);
    assert!(
        first_call(&five, "a.ts::caller::1").confidence
            < first_call(&two, "a.ts::caller::1").confidence
    );
}

#[test]
fn external_import_is_unresolved_by_design() {
    let graph = resolve_files(&[(
        "a.ts",
        "import express named=express\nfn caller\ncall express\n",
    )]);
    let reference = first_call(&graph, "a.ts::caller::2");

    assert!(!reference.resolved);
    assert_eq!(
        reference.unresolved_reason,
        Some(UnresolvedReason::ExternalLibrary)
    );
    assert_eq!(reference.confidence, 0.0);
}

#[test]
fn unknown_name_is_treated_as_external() {
    let graph = resolve_files(&[("a.ts", "fn caller\ncall console_log\n")]);
    let reference = first_call(&graph, "a.ts::caller::1");

    assert!(!reference.resolved);
    assert_eq!(
        reference.unresolved_reason,
        Some(UnresolvedReason::ExternalLibrary)
    );
}

#[test]
fn dynamic_shapes_are_never_resolved() {
    let cases = [
        ("shape=computed", UnresolvedReason::ComputedName),
        ("shape=reflection", UnresolvedReason::Reflection),
        ("shape=eval", UnresolvedReason::Eval),
        ("shape=plugin", UnresolvedReason::PluginSystem),
        ("shape=dynamic", UnresolvedReason::DynamicDispatch),
    ];
    for (shape, expected) in cases {
        let text = format!("fn caller\ncall target {shape}\nfn target\n");
        let graph = resolve_files(&[("a.ts", &text)]);
        let reference = first_call(&graph, "a.ts::caller::1");

        assert!(!reference.resolved, "shape {shape} must stay unresolved");
        assert_eq!(reference.unresolved_reason, Some(expected));
        assert_eq!(reference.confidence, 0.0);
        assert!(reference.candidates.is_empty());
    }
}

#[test]
fn call_through_parameter_is_higher_order() {
    // `callback` is a parameter of the caller; even a direct-looking call
    // through it is dynamic.
    let graph = resolve_files(&[
        ("a.ts", "fn apply params=callback\ncall callback\n"),
        ("b.ts", "fn callback\n"),
    ]);
    let reference = first_call(&graph, "a.ts::apply::1");

    assert!(!reference.resolved);
    assert_eq!(
        reference.unresolved_reason,
        Some(UnresolvedReason::HigherOrder)
    );
}

#[test]
fn fallback_files_get_a_confidence_penalty_within_tier_floors() {
    let clean = resolve_files(&[("a.ts", "fn caller\ncall helper\nfn helper\n")]);
    let degraded = resolve_files_with(
        &[("a.ts", "fn caller\ncall helper\nfn helper\n")],
        &["a.ts"],
    );

    let clean_ref = first_call(&clean, "a.ts::caller::1");
    let degraded_ref = first_call(&degraded, "a.ts::caller::1");
    assert!(degraded_ref.confidence < clean_ref.confidence);
    // The penalty never pushes the exact-match tier below its floor.
    assert!(degraded_ref.confidence >= 0.9);
}

#[test]
fn back_references_are_deduplicated_per_caller() {
    // Two call sites from the same caller to the same callee.
    let graph = resolve_files(&[(
        "a.ts",
        "fn caller\ncall helper\ncall helper\nfn helper\n",
    )]);
    let helper = graph.get("a.ts::helper::4").unwrap();
    assert_eq!(helper.called_by, vec!["a.ts::caller::1".to_string()]);
}

#[test]
fn index_is_not_mutated_by_resolution() {
    let extractions = vec![
        extraction("a.ts", "fn caller\ncall helper\nfn helper\n", false),
        extraction("b.ts", "fn other\ncall helper\n", false),
    ];
    let assembler = GraphAssembler::new(EntryPointRegistry::new());
    let mut output = assembler.assemble("/test", &extractions);

    let config = ResolutionConfig::default();
    let fallback: FxHashSet<String> = FxHashSet::default();
    let resolver = CallResolver::new(&output.index, &fallback, &config);
    resolver.resolve_all(&mut output.graph);

    // Same lookups still answer identically after a pass.
    assert_eq!(output.index.by_simple("helper").len(), 1);
    assert_eq!(output.index.in_file("a.ts", "helper").len(), 1);
}
