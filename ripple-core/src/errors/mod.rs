//! Error handling for Ripple.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod config_error;
pub mod error_code;
pub mod extraction_error;
pub mod graph_error;
pub mod pipeline_error;
pub mod query_error;
pub mod scan_error;
pub mod snapshot_error;

pub use config_error::ConfigError;
pub use error_code::RippleErrorCode;
pub use extraction_error::ExtractionError;
pub use graph_error::GraphError;
pub use pipeline_error::{PipelineError, PipelineResult};
pub use query_error::QueryError;
pub use scan_error::ScanError;
pub use snapshot_error::SnapshotError;
