//! Configuration for Ripple, loaded from `ripple.toml`.

pub mod extraction_config;
pub mod impact_config;
pub mod resolution_config;
pub mod ripple_config;
pub mod scanner_config;

pub use extraction_config::ExtractionConfig;
pub use impact_config::ImpactConfig;
pub use resolution_config::ResolutionConfig;
pub use ripple_config::RippleConfig;
pub use scanner_config::ScannerConfig;
