//! Deterministic two-strategy merge.
//!
//! Pure function over two already-computed result sets: the primary's items
//! are kept verbatim; fallback items are added only when no primary item
//! shares the same deduplication key. Keeping the strategies' control flow
//! apart keeps each independently testable.

use ripple_core::types::collections::FxHashSet;

use super::types::{ExtractionQuality, RawExtraction, StrategyKind};

/// Merge fallback facts into the primary result set. Primary wins on every
/// key collision.
///
/// Deduplication keys: `name + start line` for functions, `calleeName +
/// line` for calls, `source + line` for imports, `name + line` for exports
/// and declarations, `table + line` for data access.
pub fn merge_facts(primary: RawExtraction, fallback: RawExtraction) -> RawExtraction {
    let mut merged = primary;

    let keys: FxHashSet<(String, u32)> = merged
        .functions
        .iter()
        .map(|f| (f.name.clone(), f.start_line))
        .collect();
    merged.functions.extend(
        fallback
            .functions
            .into_iter()
            .filter(|f| !keys.contains(&(f.name.clone(), f.start_line))),
    );

    let keys: FxHashSet<(String, u32)> = merged
        .calls
        .iter()
        .map(|c| (c.callee_name.clone(), c.line))
        .collect();
    merged.calls.extend(
        fallback
            .calls
            .into_iter()
            .filter(|c| !keys.contains(&(c.callee_name.clone(), c.line))),
    );

    let keys: FxHashSet<(String, u32)> = merged
        .imports
        .iter()
        .map(|i| (i.source.clone(), i.line))
        .collect();
    merged.imports.extend(
        fallback
            .imports
            .into_iter()
            .filter(|i| !keys.contains(&(i.source.clone(), i.line))),
    );

    let keys: FxHashSet<(String, u32)> = merged
        .exports
        .iter()
        .map(|e| (e.name.clone(), e.line))
        .collect();
    merged.exports.extend(
        fallback
            .exports
            .into_iter()
            .filter(|e| !keys.contains(&(e.name.clone(), e.line))),
    );

    let keys: FxHashSet<(String, u32)> = merged
        .declarations
        .iter()
        .map(|d| (d.name.clone(), d.line))
        .collect();
    merged.declarations.extend(
        fallback
            .declarations
            .into_iter()
            .filter(|d| !keys.contains(&(d.name.clone(), d.line))),
    );

    let keys: FxHashSet<(String, u32)> = merged
        .data_access
        .iter()
        .map(|a| (a.table.clone(), a.line))
        .collect();
    merged.data_access.extend(
        fallback
            .data_access
            .into_iter()
            .filter(|a| !keys.contains(&(a.table.clone(), a.line))),
    );

    merged.errors.extend(fallback.errors);
    merged
}

/// Combine the two strategies' quality records into one.
///
/// Coverage is the item-count-weighted combination of both strategies'
/// confidence; `used_fallback` is always set.
pub fn merge_quality(
    primary: &ExtractionQuality,
    fallback: &ExtractionQuality,
    merged_item_count: u32,
    elapsed_us: u64,
) -> ExtractionQuality {
    let p_items = primary.item_count.max(1) as f32;
    let f_items = fallback.item_count.max(1) as f32;
    let coverage = (primary.coverage * p_items + fallback.coverage * f_items) / (p_items + f_items);

    ExtractionQuality {
        strategy: StrategyKind::Merged,
        coverage: coverage.clamp(0.0, 1.0),
        parse_error_count: primary.parse_error_count + fallback.parse_error_count,
        item_count: merged_item_count,
        used_fallback: true,
        elapsed_us,
    }
}
