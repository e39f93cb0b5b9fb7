//! The call resolver.
//!
//! Strategies run in order of specificity until one succeeds:
//! (a) exact match in the same file or via a resolved import path,
//! (b) class-scoped match when the receiver's class is statically known,
//! (c) global simple-name match across the project.
//!
//! Confidence is assigned from fixed tiers per strategy — deliberately not
//! a computed statistic. Dynamic call shapes are never resolved: they get a
//! closed-set reason and confidence 0.
//!
//! The name index is read-only during this phase, so references are
//! resolved in parallel per caller; back-references are accumulated
//! per-task and merged in one sequential step afterward.

use rayon::prelude::*;
use ripple_core::config::ResolutionConfig;
use ripple_core::types::collections::FxHashSet;
use smallvec::{smallvec, SmallVec};
use tracing::debug;

use crate::extraction::CallShape;
use crate::graph::index::ModuleTarget;
use crate::graph::{
    CallGraph, CallReference, FunctionId, FunctionRecord, NameIndex, ResolutionKind,
    UnresolvedReason,
};

use super::diagnostics::ResolutionDiagnostics;

// Fixed confidence tiers. Chosen so each strategy stays inside its band
// even after the fallback penalty: exact ≥0.9, class-scoped 0.75–0.9,
// global 0.5–0.7.
const TIER_SAME_FILE: f32 = 0.95;
const TIER_IMPORT: f32 = 0.93;
const TIER_CLASS_THIS: f32 = 0.88;
const TIER_CLASS_TYPED: f32 = 0.83;
const TIER_CLASS_STATIC: f32 = 0.79;
const TIER_GLOBAL: f32 = 0.70;

/// Resolves every call reference in an assembled graph.
pub struct CallResolver<'a> {
    index: &'a NameIndex,
    /// Files extracted via the regex fallback: their calls get a penalty.
    fallback_files: &'a FxHashSet<String>,
    config: &'a ResolutionConfig,
}

impl<'a> CallResolver<'a> {
    pub fn new(
        index: &'a NameIndex,
        fallback_files: &'a FxHashSet<String>,
        config: &'a ResolutionConfig,
    ) -> Self {
        Self {
            index,
            fallback_files,
            config,
        }
    }

    /// Resolve all references and write back-references onto callees.
    ///
    /// The parallel pass reads shared state only; all mutation happens in
    /// the sequential merge below it.
    pub fn resolve_all(&self, graph: &mut CallGraph) -> ResolutionDiagnostics {
        let mut caller_ids: Vec<FunctionId> = graph.functions.keys().cloned().collect();
        caller_ids.sort();

        let functions = &graph.functions;
        type TaskResult = (
            FunctionId,
            Vec<CallReference>,
            Vec<(FunctionId, FunctionId)>, // (callee, caller)
            ResolutionDiagnostics,
        );

        let task_results: Vec<TaskResult> = caller_ids
            .par_iter()
            .map(|id| {
                let caller = &functions[id];
                let mut local = ResolutionDiagnostics::default();
                let mut backrefs = Vec::new();

                let calls: Vec<CallReference> = caller
                    .calls
                    .iter()
                    .map(|reference| {
                        let resolved = self.resolve_reference(reference, caller, &mut local);
                        if let Some(callee_id) = &resolved.callee_id {
                            backrefs.push((callee_id.clone(), caller.id.clone()));
                        }
                        resolved
                    })
                    .collect();

                (id.clone(), calls, backrefs, local)
            })
            .collect();

        // Sequential merge: write each caller's calls, then append
        // back-references grouped per callee.
        let mut diagnostics = ResolutionDiagnostics::default();
        let mut all_backrefs: Vec<(FunctionId, FunctionId)> = Vec::new();
        for (caller_id, calls, backrefs, local) in task_results {
            if let Some(record) = graph.functions.get_mut(&caller_id) {
                record.calls = calls;
            }
            all_backrefs.extend(backrefs);
            diagnostics.merge(&local);
        }

        for (callee_id, caller_id) in all_backrefs {
            if let Some(callee) = graph.functions.get_mut(&callee_id) {
                callee.called_by.push(caller_id);
            }
        }
        for record in graph.functions.values_mut() {
            record.called_by.sort();
            record.called_by.dedup();
        }

        debug!(
            resolved = diagnostics.resolved_total(),
            ambiguous = diagnostics.ambiguous,
            "resolution complete"
        );
        diagnostics
    }

    fn resolve_reference(
        &self,
        reference: &CallReference,
        caller: &FunctionRecord,
        diagnostics: &mut ResolutionDiagnostics,
    ) -> CallReference {
        // Inherently dynamic shapes: not attempted, by design.
        if let Some(reason) = dynamic_reason(reference.shape) {
            diagnostics.record_unresolved(reason);
            return unresolved(reference, reason);
        }

        // A direct call through a parameter of the enclosing function is a
        // higher-order call even when the extractor saw a plain identifier.
        if caller
            .parameters
            .iter()
            .any(|p| p.name == reference.callee_name)
        {
            diagnostics.record_unresolved(UnresolvedReason::HigherOrder);
            return unresolved(reference, UnresolvedReason::HigherOrder);
        }

        // (a) exact match: same file, then via resolved import path.
        let in_file = self.index.in_file(&caller.file, &reference.callee_name);
        if !in_file.is_empty() {
            diagnostics.same_file += 1;
            return self.resolved(
                reference,
                in_file[0].clone(),
                TIER_SAME_FILE,
                ResolutionKind::SameFile,
                caller,
            );
        }

        // Qualified names written at the call site ("UserService.find").
        if reference.callee_name.contains('.') {
            if let Some(id) = self.index.by_qualified(&reference.callee_name).first() {
                let same_file = id.starts_with(&format!("{}::", caller.file));
                let (tier, kind) = if same_file {
                    diagnostics.same_file += 1;
                    (TIER_SAME_FILE, ResolutionKind::SameFile)
                } else {
                    diagnostics.import += 1;
                    (TIER_IMPORT, ResolutionKind::Import)
                };
                return self.resolved(reference, id.clone(), tier, kind, caller);
            }
        }

        match self.match_via_imports(reference, caller) {
            ImportMatch::Found(id) => {
                diagnostics.import += 1;
                return self.resolved(reference, id, TIER_IMPORT, ResolutionKind::Import, caller);
            }
            ImportMatch::External => {
                diagnostics.record_unresolved(UnresolvedReason::ExternalLibrary);
                return unresolved(reference, UnresolvedReason::ExternalLibrary);
            }
            ImportMatch::None => {}
        }

        // (b) class-scoped match.
        if let Some((id, tier)) = self.match_class_scoped(reference, caller) {
            diagnostics.class_scoped += 1;
            return self.resolved(reference, id, tier, ResolutionKind::ClassScoped, caller);
        }

        // (c) global simple-name match.
        let global = self.index.by_simple(&reference.callee_name);
        match global.len() {
            0 => {
                // No definition anywhere in the project: a library or
                // builtin call.
                diagnostics.record_unresolved(UnresolvedReason::ExternalLibrary);
                unresolved(reference, UnresolvedReason::ExternalLibrary)
            }
            1 => {
                diagnostics.global_unique += 1;
                self.resolved(
                    reference,
                    global[0].clone(),
                    TIER_GLOBAL,
                    ResolutionKind::Global,
                    caller,
                )
            }
            k => {
                // Ambiguous: all candidates recorded, confidence shrinking
                // with candidate count, resolved stays false.
                diagnostics.ambiguous += 1;
                let floor = self.config.effective_ambiguity_floor();
                let confidence =
                    (TIER_GLOBAL - 0.05 * (k as f32 - 1.0)).max(floor);
                CallReference {
                    resolved: false,
                    callee_id: None,
                    candidates: global.iter().cloned().collect(),
                    confidence: self.weighted(confidence, caller),
                    resolution: None,
                    unresolved_reason: None,
                    ..reference.clone()
                }
            }
        }
    }

    /// Strategy (a), import half. Looks for the callee among the caller
    /// file's imports: named, default, or `namespace.member` with the
    /// reference's receiver as the namespace.
    fn match_via_imports(&self, reference: &CallReference, caller: &FunctionRecord) -> ImportMatch {
        for import in self.index.imports_of(&caller.file) {
            let name_matches = import
                .named
                .iter()
                .any(|n| n == &reference.callee_name)
                || import.default.as_deref() == Some(reference.callee_name.as_str());
            let namespace_matches = match (&reference.receiver, &import.namespace) {
                (Some(receiver), Some(namespace)) => receiver == namespace,
                _ => false,
            };
            if !name_matches && !namespace_matches {
                continue;
            }

            match self.index.resolve_module(&caller.file, &import.source) {
                ModuleTarget::File(file) => {
                    let candidates = self.index.in_file(&file, &reference.callee_name);
                    if let Some(id) = candidates.first() {
                        return ImportMatch::Found(id.clone());
                    }
                    // The import resolved but the symbol is not defined in
                    // that file (re-export chains, conditionals): let the
                    // global strategy have a go.
                    return ImportMatch::None;
                }
                ModuleTarget::External => return ImportMatch::External,
            }
        }
        ImportMatch::None
    }

    /// Strategy (b): the receiver's class is statically known.
    fn match_class_scoped(
        &self,
        reference: &CallReference,
        caller: &FunctionRecord,
    ) -> Option<(FunctionId, f32)> {
        let receiver = reference.receiver.as_deref()?;

        // `this.method()` / `self.method()` inside a class member.
        if receiver == "this" || receiver == "self" {
            let (class, _) = caller.qualified_name.split_once('.')?;
            let candidates = self.index.class_method(class, &reference.callee_name);
            return candidates.first().map(|id| (id.clone(), TIER_CLASS_THIS));
        }

        // Receiver is a parameter with a type annotation.
        if let Some(annotation) = caller
            .parameters
            .iter()
            .find(|p| p.name == receiver)
            .and_then(|p| p.type_annotation.as_deref())
        {
            let candidates = self.index.class_method(annotation, &reference.callee_name);
            if let Some(id) = candidates.first() {
                return Some((id.clone(), TIER_CLASS_TYPED));
            }
        }

        // Receiver written as a class name: `UserService.find()`.
        let candidates = self.index.class_method(receiver, &reference.callee_name);
        candidates.first().map(|id| (id.clone(), TIER_CLASS_STATIC))
    }

    fn resolved(
        &self,
        reference: &CallReference,
        callee_id: FunctionId,
        tier: f32,
        kind: ResolutionKind,
        caller: &FunctionRecord,
    ) -> CallReference {
        let candidates: SmallVec<[FunctionId; 2]> = smallvec![callee_id.clone()];
        CallReference {
            resolved: true,
            callee_id: Some(callee_id),
            candidates,
            confidence: self.weighted(tier, caller),
            resolution: Some(kind),
            unresolved_reason: None,
            ..reference.clone()
        }
    }

    /// Apply the regex-fallback quality penalty for the caller's file.
    fn weighted(&self, confidence: f32, caller: &FunctionRecord) -> f32 {
        let penalty = if self.fallback_files.contains(&caller.file) {
            self.config.effective_fallback_penalty()
        } else {
            0.0
        };
        (confidence - penalty).clamp(0.0, 1.0)
    }
}

enum ImportMatch {
    Found(FunctionId),
    External,
    None,
}

fn dynamic_reason(shape: CallShape) -> Option<UnresolvedReason> {
    match shape {
        CallShape::Computed => Some(UnresolvedReason::ComputedName),
        CallShape::Reflection => Some(UnresolvedReason::Reflection),
        CallShape::Eval => Some(UnresolvedReason::Eval),
        CallShape::HigherOrder => Some(UnresolvedReason::HigherOrder),
        CallShape::PluginHook => Some(UnresolvedReason::PluginSystem),
        CallShape::DynamicReceiver => Some(UnresolvedReason::DynamicDispatch),
        CallShape::Direct | CallShape::Method => None,
    }
}

fn unresolved(reference: &CallReference, reason: UnresolvedReason) -> CallReference {
    CallReference {
        resolved: false,
        callee_id: None,
        candidates: SmallVec::new(),
        confidence: 0.0,
        resolution: None,
        unresolved_reason: Some(reason),
        ..reference.clone()
    }
}
