//! Entry-point recognition.
//!
//! A function is an entry point when it is exported and its name matches a
//! recognized shape, or when it carries a decorator the external pattern
//! registry knows about. The registry is consumed, not computed, here.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// What kind of entry point a function is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryPointKind {
    HttpHandler,
    CliCommand,
    EventHandler,
    Test,
    ScheduledJob,
    /// Exported symbol with no known caller.
    ExportedRoot,
}

impl EntryPointKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::HttpHandler => "http-handler",
            Self::CliCommand => "cli-command",
            Self::EventHandler => "event-handler",
            Self::Test => "test",
            Self::ScheduledJob => "scheduled-job",
            Self::ExportedRoot => "exported-root",
        }
    }
}

static HTTP_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(get|post|put|patch|delete|head)([A-Z_]\w*)?$").unwrap());
static CLI_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(main|run|cli|cmd_\w+|\w+_command|\w+Command)$").unwrap());
static EVENT_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(on[A-Z_]\w*|handle[A-Z_]\w*|\w+_handler|\w+_listener)$").unwrap());
static TEST_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(test[_A-Z]\w*|\w+_test|\w+Test|it_\w+|should[A-Z_]\w*)$").unwrap());
static SCHEDULED_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\w*cron\w*|\w+_job|scheduled?[A-Z_]\w*)$").unwrap());

/// Decorator patterns contributed by the external recognition registry.
///
/// Each entry maps a decorator substring (matched case-insensitively
/// against the decorator text as written) to the entry-point kind it
/// implies.
#[derive(Debug, Clone, Default)]
pub struct EntryPointRegistry {
    decorators: Vec<(String, EntryPointKind)>,
}

impl EntryPointRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a decorator pattern, e.g. `("@Get", HttpHandler)` or
    /// `("@Scheduled", ScheduledJob)`.
    pub fn with_decorator(mut self, pattern: impl Into<String>, kind: EntryPointKind) -> Self {
        self.decorators.push((pattern.into().to_lowercase(), kind));
        self
    }

    fn classify_decorators(&self, decorators: &[String]) -> Option<EntryPointKind> {
        for decorator in decorators {
            let lower = decorator.to_lowercase();
            for (pattern, kind) in &self.decorators {
                if lower.contains(pattern.as_str()) {
                    return Some(*kind);
                }
            }
        }
        None
    }
}

/// Classify a function by decorator (registry first) or name shape.
///
/// Only exported functions qualify by shape; a registry decorator marks the
/// function regardless of export status (frameworks invoke decorated
/// members without an explicit export).
pub fn classify(
    name: &str,
    decorators: &[String],
    is_exported: bool,
    registry: &EntryPointRegistry,
) -> Option<EntryPointKind> {
    if let Some(kind) = registry.classify_decorators(decorators) {
        return Some(kind);
    }
    if !is_exported {
        // Test functions are recognized even without an export: most test
        // frameworks discover them by name.
        if TEST_SHAPE.is_match(name) {
            return Some(EntryPointKind::Test);
        }
        return None;
    }
    if TEST_SHAPE.is_match(name) {
        return Some(EntryPointKind::Test);
    }
    if HTTP_SHAPE.is_match(name) {
        return Some(EntryPointKind::HttpHandler);
    }
    if EVENT_SHAPE.is_match(name) {
        return Some(EntryPointKind::EventHandler);
    }
    if SCHEDULED_SHAPE.is_match(name) {
        return Some(EntryPointKind::ScheduledJob);
    }
    if CLI_SHAPE.is_match(name) {
        return Some(EntryPointKind::CliCommand);
    }
    None
}
