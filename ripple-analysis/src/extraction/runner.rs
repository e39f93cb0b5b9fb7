//! Hybrid extraction runner.
//!
//! One rayon task per file; each task runs the primary strategy under a
//! hard timeout, degrades to the fallback on failure/timeout/poor coverage,
//! and merges the two result sets deterministically. A single file's
//! failure never aborts the batch.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use ripple_core::config::ExtractionConfig;
use ripple_core::errors::ExtractionError;
use tracing::{debug, warn};

use crate::scanner::SourceFile;

use super::merge::{merge_facts, merge_quality};
use super::strategy::{ExtractionStrategy, StrategyRegistry};
use super::types::{ExtractionQuality, FileExtraction, RawExtraction, StrategyKind};

/// Outcome of one strategy invocation.
enum RunOutcome {
    Ok(RawExtraction),
    Failed(String),
    TimedOut,
}

/// Drives hybrid extraction across a set of source files.
pub struct ExtractionRunner {
    registry: Arc<StrategyRegistry>,
    config: ExtractionConfig,
}

impl ExtractionRunner {
    pub fn new(registry: Arc<StrategyRegistry>, config: ExtractionConfig) -> Self {
        Self { registry, config }
    }

    /// Extract every file in parallel. Results come back in input order.
    ///
    /// The returned errors are the non-fatal per-file failures (timeouts,
    /// unsupported languages, total parse failures) for pipeline reporting;
    /// each is also recorded in its file's error list.
    pub fn extract_all(
        &self,
        files: &[SourceFile],
    ) -> (Vec<FileExtraction>, Vec<ExtractionError>) {
        let results: Vec<(FileExtraction, Vec<ExtractionError>)> = files
            .par_iter()
            .map(|file| self.extract_file(file))
            .collect();

        let mut extractions = Vec::with_capacity(results.len());
        let mut errors = Vec::new();
        for (extraction, file_errors) in results {
            extractions.push(extraction);
            errors.extend(file_errors);
        }
        (extractions, errors)
    }

    /// Extract a single file. Never fails: failures degrade to the fallback
    /// strategy or to an explicit error result.
    pub fn extract_file(&self, source: &SourceFile) -> (FileExtraction, Vec<ExtractionError>) {
        let start = Instant::now();
        let timeout = Duration::from_millis(self.config.effective_parse_timeout_ms());
        let poor_min = self.config.effective_poor_coverage_min_bytes();
        let mut errors: Vec<ExtractionError> = Vec::new();

        let primary = self.registry.primary(source.language);
        let fallback = self.registry.fallback(source.language);

        if primary.is_none() && fallback.is_none() {
            let err = ExtractionError::UnsupportedLanguage {
                file: source.path.clone(),
                language: source.language.name().to_string(),
            };
            let extraction = self.error_result(source, err.to_string(), start);
            return (extraction, vec![err]);
        }

        // Primary pass.
        let primary_raw = match &primary {
            Some(strategy) => {
                match run_with_timeout(Arc::clone(strategy), source, timeout) {
                    RunOutcome::Ok(raw) => Some(raw),
                    RunOutcome::Failed(message) => {
                        errors.push(ExtractionError::ParseFailed {
                            file: source.path.clone(),
                            message: message.clone(),
                        });
                        debug!(file = %source.path, %message, "primary strategy failed, degrading");
                        None
                    }
                    RunOutcome::TimedOut => {
                        errors.push(ExtractionError::Timeout {
                            file: source.path.clone(),
                            timeout_ms: timeout.as_millis() as u64,
                        });
                        warn!(file = %source.path, timeout_ms = timeout.as_millis() as u64, "primary strategy timed out");
                        None
                    }
                }
            }
            None => None,
        };

        let poor_coverage = primary_raw
            .as_ref()
            .is_some_and(|raw| {
                raw.functions.is_empty()
                    && raw.declarations.is_empty()
                    && source.text.len() >= poor_min
            });

        // Fallback pass, when needed and available.
        let need_fallback = primary_raw.is_none() || poor_coverage;
        let fallback_raw = if need_fallback {
            match &fallback {
                Some(strategy) => match run_with_timeout(Arc::clone(strategy), source, timeout) {
                    RunOutcome::Ok(raw) => Some(raw),
                    RunOutcome::Failed(message) => {
                        errors.push(ExtractionError::ParseFailed {
                            file: source.path.clone(),
                            message,
                        });
                        None
                    }
                    RunOutcome::TimedOut => {
                        errors.push(ExtractionError::Timeout {
                            file: source.path.clone(),
                            timeout_ms: timeout.as_millis() as u64,
                        });
                        None
                    }
                },
                None => None,
            }
        } else {
            None
        };

        let elapsed_us = start.elapsed().as_micros() as u64;
        let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();

        let extraction = match (primary_raw, fallback_raw) {
            // Both ran: deterministic merge, primary wins.
            (Some(primary_raw), Some(fallback_raw)) => {
                let p_quality =
                    self.single_quality(StrategyKind::Structural, &primary_raw, source, 0, false);
                let f_quality =
                    self.single_quality(StrategyKind::Regex, &fallback_raw, source, 0, false);
                let mut facts = merge_facts(primary_raw, fallback_raw);
                facts.errors.extend(error_messages);
                let quality =
                    merge_quality(&p_quality, &f_quality, facts.item_count(), elapsed_us);
                self.finish(source, facts, quality)
            }
            // Primary alone.
            (Some(mut facts), None) => {
                let used_fallback = need_fallback; // fallback wanted but unavailable/failed
                facts.errors.extend(error_messages);
                let quality = self.single_quality(
                    StrategyKind::Structural,
                    &facts,
                    source,
                    elapsed_us,
                    used_fallback,
                );
                self.finish(source, facts, quality)
            }
            // Fallback alone.
            (None, Some(mut facts)) => {
                facts.errors.extend(error_messages);
                let quality =
                    self.single_quality(StrategyKind::Regex, &facts, source, elapsed_us, true);
                self.finish(source, facts, quality)
            }
            // Nothing produced anything usable.
            (None, None) => {
                let message = error_messages
                    .first()
                    .cloned()
                    .unwrap_or_else(|| "no strategy produced a result".to_string());
                self.error_result(source, message, start)
            }
        };

        (extraction, errors)
    }

    fn single_quality(
        &self,
        kind: StrategyKind,
        raw: &RawExtraction,
        source: &SourceFile,
        elapsed_us: u64,
        used_fallback: bool,
    ) -> ExtractionQuality {
        let parse_error_count = raw.errors.len() as u32;
        let item_count = raw.item_count();
        let base = kind.base_confidence();
        let poor_min = self.config.effective_poor_coverage_min_bytes();

        let coverage = if item_count == 0 && source.text.len() >= poor_min {
            0.0
        } else {
            let penalty = (parse_error_count as f32 * 0.05).min(0.4);
            base * (1.0 - penalty)
        };

        ExtractionQuality {
            strategy: kind,
            coverage,
            parse_error_count,
            item_count,
            used_fallback,
            elapsed_us,
        }
    }

    fn finish(
        &self,
        source: &SourceFile,
        facts: RawExtraction,
        quality: ExtractionQuality,
    ) -> FileExtraction {
        FileExtraction {
            file: source.path.clone(),
            language: source.language,
            content_hash: source.content_hash,
            facts,
            quality,
        }
    }

    fn error_result(&self, source: &SourceFile, message: String, start: Instant) -> FileExtraction {
        let facts = RawExtraction {
            errors: vec![message],
            ..Default::default()
        };
        FileExtraction {
            file: source.path.clone(),
            language: source.language,
            content_hash: source.content_hash,
            quality: ExtractionQuality {
                strategy: StrategyKind::Structural,
                coverage: 0.0,
                parse_error_count: 1,
                item_count: 0,
                used_fallback: true,
                elapsed_us: start.elapsed().as_micros() as u64,
            },
            facts,
        }
    }
}

/// Run one strategy on a worker thread, bounded by `timeout`.
///
/// On timeout the worker is left to finish on its own and its result is
/// discarded; the pool is never blocked by a pathological file.
fn run_with_timeout(
    strategy: Arc<dyn ExtractionStrategy>,
    source: &SourceFile,
    timeout: Duration,
) -> RunOutcome {
    let (tx, rx) = crossbeam_channel::bounded(1);
    let file = source.path.clone();
    let text = source.text.clone();

    std::thread::spawn(move || {
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            strategy.extract(&file, &text)
        }));
        let outcome = match result {
            Ok(Ok(raw)) => RunOutcome::Ok(raw),
            Ok(Err(e)) => RunOutcome::Failed(e.message),
            Err(_) => RunOutcome::Failed("strategy panicked".to_string()),
        };
        let _ = tx.send(outcome);
    });

    match rx.recv_timeout(timeout) {
        Ok(outcome) => outcome,
        Err(_) => RunOutcome::TimedOut,
    }
}
