//! Scanner configuration.

use serde::{Deserialize, Serialize};

/// Configuration for project file discovery.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScannerConfig {
    /// Maximum file size in bytes. Larger files are skipped. Default: 2 MiB.
    pub max_file_size: Option<u64>,
    /// Additional glob patterns to exclude beyond .gitignore.
    pub exclude: Vec<String>,
    /// Whether to honor .gitignore files. Default: true.
    pub respect_gitignore: Option<bool>,
}

impl ScannerConfig {
    /// Returns the effective max file size, defaulting to 2 MiB.
    pub fn effective_max_file_size(&self) -> u64 {
        self.max_file_size.unwrap_or(2 * 1024 * 1024)
    }

    /// Returns whether .gitignore files are honored, defaulting to true.
    pub fn effective_respect_gitignore(&self) -> bool {
        self.respect_gitignore.unwrap_or(true)
    }
}
