//! Top-level configuration, loaded from `ripple.toml` at the project root.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

use super::{ExtractionConfig, ImpactConfig, ResolutionConfig, ScannerConfig};

/// Top-level Ripple configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RippleConfig {
    pub scanner: ScannerConfig,
    pub extraction: ExtractionConfig,
    pub resolution: ResolutionConfig,
    pub impact: ImpactConfig,
}

impl RippleConfig {
    /// Load configuration from a `ripple.toml` file.
    ///
    /// A missing file yields the defaults; a malformed file is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&text).map_err(|e| ConfigError::ParseFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}
