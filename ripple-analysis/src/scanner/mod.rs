//! Project scanner — file discovery, language detection, content hashing.
//!
//! The scanner is the entry point to the pipeline: it walks the project
//! root, detects languages from extensions, and hands `(path, text,
//! language)` tuples to the extraction layer.

pub mod hasher;
pub mod language_detect;
pub mod walker;

pub use language_detect::Language;
pub use walker::{SourceFile, Walker};
