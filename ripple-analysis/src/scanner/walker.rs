//! Project walker — discovers source files under a project root.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use ripple_core::config::ScannerConfig;
use ripple_core::errors::ScanError;
use tracing::{debug, warn};

use super::hasher::hash_content;
use super::language_detect::Language;

/// A discovered source file, ready for extraction.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path relative to the project root, with `/` separators.
    pub path: String,
    /// File text, lossily decoded.
    pub text: String,
    pub language: Language,
    /// xxh3 hash of the raw bytes.
    pub content_hash: u64,
}

/// Walks a project root and collects files in supported languages.
pub struct Walker {
    config: ScannerConfig,
}

impl Walker {
    pub fn new(config: ScannerConfig) -> Self {
        Self { config }
    }

    /// Discover and read all supported source files under `root`.
    ///
    /// Unreadable or oversized files are skipped with a warning; they never
    /// abort the walk.
    pub fn walk(&self, root: &Path) -> Result<Vec<SourceFile>, ScanError> {
        if !root.exists() {
            return Err(ScanError::RootNotFound(root.display().to_string()));
        }

        let max_size = self.config.effective_max_file_size();
        let mut builder = WalkBuilder::new(root);
        builder
            .git_ignore(self.config.effective_respect_gitignore())
            .hidden(true);

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let path = entry.path();
            let Some(language) = Language::from_path(path) else {
                continue;
            };
            if self.is_excluded(path, root) {
                continue;
            }

            let meta = match entry.metadata() {
                Ok(m) => m,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping file without metadata");
                    continue;
                }
            };
            if meta.len() > max_size {
                debug!(path = %path.display(), size = meta.len(), "skipping oversized file");
                continue;
            }

            let bytes = match std::fs::read(path) {
                Ok(b) => b,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable file");
                    continue;
                }
            };
            let content_hash = hash_content(&bytes);
            let text = String::from_utf8_lossy(&bytes).into_owned();

            files.push(SourceFile {
                path: relative_path(path, root),
                text,
                language,
                content_hash,
            });
        }

        // Deterministic order: ids and tie-breaking depend on it.
        files.sort_by(|a, b| a.path.cmp(&b.path));
        debug!(files = files.len(), root = %root.display(), "scan complete");
        Ok(files)
    }

    fn is_excluded(&self, path: &Path, root: &Path) -> bool {
        let rel = relative_path(path, root);
        self.config
            .exclude
            .iter()
            .any(|pattern| glob_match(pattern, &rel))
    }
}

fn relative_path(path: &Path, root: &Path) -> String {
    let rel: PathBuf = path.strip_prefix(root).unwrap_or(path).to_path_buf();
    rel.to_string_lossy().replace('\\', "/")
}

/// Minimal glob support for exclude patterns: `*` within a segment and a
/// leading/trailing `**/` / `/**` for any-directory matches.
fn glob_match(pattern: &str, path: &str) -> bool {
    if let Some(suffix) = pattern.strip_prefix("**/") {
        return glob_match(suffix, path)
            || path
                .match_indices('/')
                .any(|(i, _)| glob_match(suffix, &path[i + 1..]));
    }
    if let Some(prefix) = pattern.strip_suffix("/**") {
        return path.starts_with(&format!("{prefix}/")) || path == prefix;
    }
    if let Some(idx) = pattern.find('*') {
        let (pre, post) = (&pattern[..idx], &pattern[idx + 1..]);
        return path.starts_with(pre) && path.ends_with(post) && path.len() >= pre.len() + post.len();
    }
    pattern == path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn discovers_supported_files_in_sorted_order() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/b.ts", "function b() {}");
        write(dir.path(), "src/a.ts", "function a() {}");
        write(dir.path(), "notes.md", "not source");

        let walker = Walker::new(ScannerConfig::default());
        let files = walker.walk(dir.path()).unwrap();

        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["src/a.ts", "src/b.ts"]);
        assert_eq!(files[0].language, Language::TypeScript);
    }

    #[test]
    fn honors_exclude_patterns() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/main.py", "def main(): pass");
        write(dir.path(), "vendor/dep.py", "def dep(): pass");

        let config = ScannerConfig {
            exclude: vec!["vendor/**".to_string()],
            ..Default::default()
        };
        let files = Walker::new(config).walk(dir.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "src/main.py");
    }

    #[test]
    fn missing_root_is_an_error() {
        let walker = Walker::new(ScannerConfig::default());
        assert!(walker.walk(Path::new("/definitely/not/here")).is_err());
    }

    #[test]
    fn skips_oversized_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "big.ts", &"x".repeat(64));
        write(dir.path(), "small.ts", "f()");

        let config = ScannerConfig {
            max_file_size: Some(16),
            ..Default::default()
        };
        let files = Walker::new(config).walk(dir.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "small.ts");
    }
}
