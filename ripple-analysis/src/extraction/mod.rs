//! Hybrid extraction layer.
//!
//! Per-file, per-language scan producing raw facts: function definitions,
//! call sites, imports, exports, type declarations, and data-access facts,
//! plus a quality report. A primary structural strategy is tried first; on
//! failure, timeout, or poor coverage the regex fallback runs and the two
//! result sets are merged deterministically (primary wins on key collision).

pub mod merge;
pub mod runner;
pub mod strategy;
pub mod types;

pub use runner::ExtractionRunner;
pub use strategy::{ExtractionStrategy, StrategyError, StrategyRegistry};
pub use types::{
    CallFact, CallShape, DataAccessFact, DataOperation, DeclKind, ExportFact, ExtractionQuality,
    FileExtraction, FunctionFact, ImportFact, ParameterFact, RawExtraction, StrategyKind,
    TypeDeclFact,
};
