//! Skip rules applied while walking the tree.

use crate::domain::config::{normalize_extension, Config, DEFAULT_MAX_FILE_BYTES};
use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::Path;

/// Directories never listed: version control, dependencies, build output, caches.
pub const SKIPPED_DIRS: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "node_modules",
    "__pycache__",
    ".venv",
    "venv",
    "dist",
    "build",
    "out",
    "target",
    ".tox",
    ".eggs",
    ".next",
    ".mypy_cache",
    ".pytest_cache",
    "coverage",
];

pub const DEFAULT_SOURCE_EXTENSIONS: &[&str] = &[
    ".py", ".pyi", ".rs", ".go", ".js", ".jsx", ".mjs", ".cjs", ".ts", ".tsx", ".mts", ".cts",
    ".java", ".kt", ".kts", ".scala", ".groovy", ".c", ".h", ".cc", ".cpp", ".cxx", ".hpp",
    ".hh", ".cs", ".fs", ".fsx", ".rb", ".php", ".swift", ".m", ".mm", ".lua", ".pl", ".pm",
    ".r", ".jl", ".dart", ".ex", ".exs", ".erl", ".hrl", ".clj", ".hs", ".ml", ".mli", ".elm",
    ".vue", ".svelte", ".sh", ".bash", ".zsh", ".ps1", ".sql", ".proto", ".graphql", ".tf",
    ".zig", ".nim",
];

const KNOWN_EXTENSIONLESS: &[&str] = &[
    "makefile",
    "dockerfile",
    "rakefile",
    "gemfile",
    "procfile",
    "vagrantfile",
    "jenkinsfile",
];

/// Decides which directory entries the traversal lists and which files count as source.
#[derive(Debug, Clone)]
pub struct EntryFilter {
    source_extensions: Vec<String>,
    exclude_globs: GlobSet,
    max_file_bytes: u64,
}

impl Default for EntryFilter {
    fn default() -> Self {
        Self {
            source_extensions: DEFAULT_SOURCE_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            exclude_globs: GlobSet::empty(),
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}

impl EntryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let mut filter = Self::new()
            .exclude_globs(&config.exclude_globs)?
            .max_file_bytes(config.max_file_bytes);
        if !config.source_extensions.is_empty() {
            filter = filter.source_extensions(config.source_extensions.clone());
        }
        Ok(filter)
    }

    /// Replace the source extension allow-list (e.g. `".rs"`, `"py"`).
    pub fn source_extensions(mut self, extensions: Vec<String>) -> Self {
        self.source_extensions = extensions.iter().map(|e| normalize_extension(e)).collect();
        self
    }

    /// Glob patterns matched against root-relative, `/`-separated paths.
    pub fn exclude_globs(mut self, patterns: &[String]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern)
                .with_context(|| format!("Invalid exclude glob: {}", pattern))?;
            builder.add(glob);
        }
        self.exclude_globs = builder.build().context("Failed to build exclude glob set")?;
        Ok(self)
    }

    pub fn max_file_bytes(mut self, max_bytes: u64) -> Self {
        self.max_file_bytes = max_bytes;
        self
    }

    /// Returns true for deny-listed directory names.
    pub fn is_denied_dir(&self, name: &str) -> bool {
        SKIPPED_DIRS.contains(&name)
    }

    /// Returns true when `relative_path` matches one of the exclude globs.
    pub fn is_excluded(&self, relative_path: &str) -> bool {
        !self.exclude_globs.is_empty() && self.exclude_globs.is_match(relative_path)
    }

    /// Like [`is_excluded`](Self::is_excluded), but `dir/**` also excludes `dir` itself.
    pub fn is_excluded_dir(&self, relative_path: &str) -> bool {
        self.is_excluded(relative_path) || self.is_excluded(&format!("{}/", relative_path))
    }

    /// Returns true when the file name or extension marks the file as source code.
    pub fn is_source(&self, path: &Path) -> bool {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("").to_lowercase();
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if !ext.is_empty() => {
                self.source_extensions.contains(&normalize_extension(ext))
            }
            _ => KNOWN_EXTENSIONLESS.contains(&name.as_str()),
        }
    }

    pub fn is_oversized(&self, size: u64) -> bool {
        size > self.max_file_bytes
    }
}

/// Root-relative path with `/` separators, as matched by the exclude globs.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
