//! Name index: qualified and simple names to candidate ids.
//!
//! Built once during assembly, read-only during resolution so the resolver
//! can run in parallel.

use ripple_core::types::collections::{FxHashMap, FxHashSet};

use crate::extraction::ImportFact;

use super::types::{FunctionId, FunctionRecord};

/// Where an import specifier points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleTarget {
    /// A file inside the project root.
    File(String),
    /// An external package; never a resolution target.
    External,
}

/// Read-only lookup structure for the resolver.
#[derive(Debug, Default)]
pub struct NameIndex {
    /// qualified name → candidate ids.
    by_qualified: FxHashMap<String, Vec<FunctionId>>,
    /// simple name → candidate ids, project-wide.
    by_simple: FxHashMap<String, Vec<FunctionId>>,
    /// (file, simple name) → candidate ids.
    by_file_name: FxHashMap<(String, String), Vec<FunctionId>>,
    /// (class name, method name) → candidate ids.
    by_class_method: FxHashMap<(String, String), Vec<FunctionId>>,
    /// imports recorded per file.
    imports_by_file: FxHashMap<String, Vec<ImportFact>>,
    /// All known project files, for import path resolution.
    files: FxHashSet<String>,
}

impl NameIndex {
    /// Build the index from assembled function records, in deterministic
    /// order (callers pass records sorted by id).
    pub fn build(
        records: &[&FunctionRecord],
        imports_by_file: FxHashMap<String, Vec<ImportFact>>,
        files: FxHashSet<String>,
    ) -> Self {
        let mut index = NameIndex {
            imports_by_file,
            files,
            ..Default::default()
        };

        for record in records {
            index
                .by_qualified
                .entry(record.qualified_name.clone())
                .or_default()
                .push(record.id.clone());
            index
                .by_simple
                .entry(record.name.clone())
                .or_default()
                .push(record.id.clone());
            index
                .by_file_name
                .entry((record.file.clone(), record.name.clone()))
                .or_default()
                .push(record.id.clone());
            if let Some((class, method)) = record.qualified_name.split_once('.') {
                index
                    .by_class_method
                    .entry((class.to_string(), method.to_string()))
                    .or_default()
                    .push(record.id.clone());
            }
        }

        index
    }

    pub fn by_simple(&self, name: &str) -> &[FunctionId] {
        self.by_simple.get(name).map_or(&[], Vec::as_slice)
    }

    pub fn by_qualified(&self, name: &str) -> &[FunctionId] {
        self.by_qualified.get(name).map_or(&[], Vec::as_slice)
    }

    pub fn in_file(&self, file: &str, name: &str) -> &[FunctionId] {
        self.by_file_name
            .get(&(file.to_string(), name.to_string()))
            .map_or(&[], Vec::as_slice)
    }

    pub fn class_method(&self, class: &str, method: &str) -> &[FunctionId] {
        self.by_class_method
            .get(&(class.to_string(), method.to_string()))
            .map_or(&[], Vec::as_slice)
    }

    pub fn imports_of(&self, file: &str) -> &[ImportFact] {
        self.imports_by_file.get(file).map_or(&[], Vec::as_slice)
    }

    /// Resolve an import specifier relative to the importing file.
    ///
    /// Relative specifiers are joined against the importing file's
    /// directory and matched against known project files, trying common
    /// extensions and `index.*` forms. Anything else is an external package.
    pub fn resolve_module(&self, from_file: &str, source: &str) -> ModuleTarget {
        if !source.starts_with('.') && !source.starts_with('/') {
            return ModuleTarget::External;
        }

        let dir = match from_file.rsplit_once('/') {
            Some((dir, _)) => dir,
            None => "",
        };
        let joined = normalize_path(dir, source);

        const EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "py", "go", "rs", "java", "cs", "php"];

        if self.files.contains(&joined) {
            return ModuleTarget::File(joined);
        }
        for ext in EXTENSIONS {
            let candidate = format!("{joined}.{ext}");
            if self.files.contains(&candidate) {
                return ModuleTarget::File(candidate);
            }
        }
        for ext in EXTENSIONS {
            let candidate = format!("{joined}/index.{ext}");
            if self.files.contains(&candidate) {
                return ModuleTarget::File(candidate);
            }
        }

        // Relative but pointing outside the scanned set.
        ModuleTarget::External
    }
}

/// Join `source` onto `dir`, resolving `.` and `..` segments.
fn normalize_path(dir: &str, source: &str) -> String {
    let mut segments: Vec<&str> = if source.starts_with('/') {
        Vec::new()
    } else {
        dir.split('/').filter(|s| !s.is_empty()).collect()
    };

    for segment in source.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}
