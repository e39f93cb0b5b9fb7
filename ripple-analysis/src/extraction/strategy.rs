//! Extraction strategy contract and registry.
//!
//! One contract, many implementations selected by language tag. The
//! registry is constructed once at process start and passed in explicitly;
//! it is never mutated afterward, so there is no hidden global state.

use std::sync::Arc;

use ripple_core::types::collections::FxHashMap;

use crate::scanner::Language;

use super::types::{RawExtraction, StrategyKind};

/// A strategy-level failure: parse error, unsupported construct, internal
/// fault. Recorded per file; never aborts the batch.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct StrategyError {
    pub message: String,
}

impl StrategyError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A per-language extraction strategy.
///
/// Implementations are supplied by the embedding tool (tree-sitter
/// grammars, regex scanners, …); this crate defines only the contract.
pub trait ExtractionStrategy: Send + Sync {
    /// Whether this is a structural parser or a regex scanner.
    fn kind(&self) -> StrategyKind;

    /// The language this strategy handles.
    fn language(&self) -> Language;

    /// Extract raw facts from `text`. `file` is for error messages only.
    fn extract(&self, file: &str, text: &str) -> Result<RawExtraction, StrategyError>;
}

/// Immutable registry mapping each language to its primary strategy and an
/// optional regex fallback.
#[derive(Default)]
pub struct StrategyRegistry {
    primary: FxHashMap<Language, Arc<dyn ExtractionStrategy>>,
    fallback: FxHashMap<Language, Arc<dyn ExtractionStrategy>>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the primary structural strategy for a language.
    pub fn register_primary(&mut self, strategy: Arc<dyn ExtractionStrategy>) {
        self.primary.insert(strategy.language(), strategy);
    }

    /// Register the regex fallback strategy for a language.
    pub fn register_fallback(&mut self, strategy: Arc<dyn ExtractionStrategy>) {
        self.fallback.insert(strategy.language(), strategy);
    }

    pub fn primary(&self, language: Language) -> Option<Arc<dyn ExtractionStrategy>> {
        self.primary.get(&language).cloned()
    }

    pub fn fallback(&self, language: Language) -> Option<Arc<dyn ExtractionStrategy>> {
        self.fallback.get(&language).cloned()
    }

    /// Languages with at least one registered strategy.
    pub fn supported_languages(&self) -> Vec<Language> {
        let mut langs: Vec<Language> = self
            .primary
            .keys()
            .chain(self.fallback.keys())
            .copied()
            .collect();
        langs.sort_by_key(|l| l.name());
        langs.dedup();
        langs
    }
}
