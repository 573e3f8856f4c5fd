//! Depth-first summarization of a file tree for one lens.
//!
//! Each call returns an owned [`SummaryNode`]; children are summarized one at
//! a time in name order and folded into their parent with a single model call.
//! Model failures become in-band sentinel text. File-system errors propagate.

use crate::budget::{chars_for_tokens, DEFAULT_CONTEXT_TOKENS};
use crate::chunk::split_file;
use crate::domain::config::{DEFAULT_MAX_CHUNKS, DEFAULT_MAX_DEPTH};
use crate::domain::{
    is_skipped, NodeKind, SummaryNode, EMPTY_FILE_SUMMARY, EMPTY_FOLDER_SUMMARY, SKIPPED_SUMMARY,
};
use crate::oracle::ModelOracle;
use crate::rank::Ranker;
use crate::scan::{relative_path, EntryFilter};
use crate::summarize::{summarize, summarize_folder};
use crate::utils::{read_source_text, SourceText};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Read-only settings shared by every call of one traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalOptions {
    pub max_depth: usize,
    pub max_chunks: usize,
    pub max_chunk_chars: usize,
    pub dedupe_indices: bool,
}

impl Default for TraversalOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_chunks: DEFAULT_MAX_CHUNKS,
            max_chunk_chars: chars_for_tokens(DEFAULT_CONTEXT_TOKENS),
            dedupe_indices: false,
        }
    }
}

pub struct Traversal<'a> {
    root: PathBuf,
    lens: &'a str,
    oracle: &'a dyn ModelOracle,
    filter: &'a EntryFilter,
    options: &'a TraversalOptions,
    ranker: Ranker,
}

impl<'a> Traversal<'a> {
    pub fn new(
        root: &Path,
        lens: &'a str,
        oracle: &'a dyn ModelOracle,
        filter: &'a EntryFilter,
        options: &'a TraversalOptions,
    ) -> Self {
        Self {
            root: root.to_path_buf(),
            lens,
            oracle,
            filter,
            options,
            ranker: Ranker::new().dedupe_indices(options.dedupe_indices),
        }
    }

    /// Summarize the root at depth 0.
    pub fn run(&self) -> Result<SummaryNode> {
        self.summarize_path(&self.root, 0)
    }

    pub fn summarize_path(&self, path: &Path, depth: usize) -> Result<SummaryNode> {
        let metadata = fs::metadata(path)
            .with_context(|| format!("Failed to stat path: {}", path.display()))?;

        if depth > self.options.max_depth {
            let kind = if metadata.is_dir() { NodeKind::Folder } else { NodeKind::File };
            return Ok(SummaryNode::depth_limit(kind));
        }

        if metadata.is_dir() {
            self.summarize_folder(path, depth)
        } else {
            self.summarize_file(path, metadata.len())
        }
    }

    fn summarize_file(&self, path: &Path, size: u64) -> Result<SummaryNode> {
        if !self.filter.is_source(path) {
            return Ok(SummaryNode::file(path.to_path_buf(), SKIPPED_SUMMARY));
        }
        if self.filter.is_oversized(size) {
            tracing::debug!("skipping {} ({} bytes over the size limit)", path.display(), size);
            return Ok(SummaryNode::file(path.to_path_buf(), SKIPPED_SUMMARY));
        }

        let content = match read_source_text(path)? {
            SourceText::Text(content) => content,
            SourceText::Binary => {
                tracing::debug!("skipping binary file {}", path.display());
                return Ok(SummaryNode::file(path.to_path_buf(), SKIPPED_SUMMARY));
            }
        };
        if content.trim().is_empty() {
            return Ok(SummaryNode::file(path.to_path_buf(), EMPTY_FILE_SUMMARY));
        }

        let chunks =
            split_file(path, &content, self.options.max_chunks, self.options.max_chunk_chars);
        let ranked = self.ranker.rank(&chunks, self.lens, self.oracle);
        let summary = summarize(&ranked, self.lens, self.oracle);

        tracing::debug!(
            "[{}] summarized {} ({} chunks, {} ranked)",
            self.lens,
            path.display(),
            chunks.len(),
            ranked.len()
        );
        Ok(SummaryNode::file(path.to_path_buf(), summary))
    }

    fn summarize_folder(&self, path: &Path, depth: usize) -> Result<SummaryNode> {
        let mut children = Vec::new();
        for entry in self.list_entries(path)? {
            let child = self.summarize_path(&entry, depth + 1)?;
            if !is_skipped(&child.summary) {
                children.push(child);
            }
        }

        if children.is_empty() {
            tracing::debug!("[{}] {} has no summarizable entries", self.lens, path.display());
            return Ok(SummaryNode::folder(path.to_path_buf(), EMPTY_FOLDER_SUMMARY, Vec::new()));
        }

        let summary = summarize_folder(&folder_name(path), &children, self.lens, self.oracle);
        tracing::debug!(
            "[{}] summarized folder {} ({} children)",
            self.lens,
            path.display(),
            children.len()
        );
        Ok(SummaryNode::folder(path.to_path_buf(), summary, children))
    }

    /// Direct entries of `dir`, sorted by name, minus deny-listed directories,
    /// exclude-glob matches and broken symlinks.
    fn list_entries(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let read_dir = fs::read_dir(dir)
            .with_context(|| format!("Failed to list directory: {}", dir.display()))?;

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry =
                entry.with_context(|| format!("Failed to read entry in {}", dir.display()))?;
            let path = entry.path();
            let file_type = entry
                .file_type()
                .with_context(|| format!("Failed to read file type: {}", path.display()))?;

            let is_dir = if file_type.is_symlink() {
                match fs::metadata(&path) {
                    Ok(target) => target.is_dir(),
                    Err(e) => {
                        tracing::warn!("skipping broken symlink {}: {}", path.display(), e);
                        continue;
                    }
                }
            } else {
                file_type.is_dir()
            };

            let name = entry.file_name();
            if is_dir && self.filter.is_denied_dir(&name.to_string_lossy()) {
                continue;
            }
            let rel = relative_path(&self.root, &path);
            let excluded = if is_dir {
                self.filter.is_excluded_dir(&rel)
            } else {
                self.filter.is_excluded(&rel)
            };
            if excluded {
                continue;
            }
            entries.push((name, path));
        }

        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(entries.into_iter().map(|(_, path)| path).collect())
    }
}

/// Summarize `root` for one lens.
pub fn summarize_tree(
    root: &Path,
    lens: &str,
    oracle: &dyn ModelOracle,
    filter: &EntryFilter,
    options: &TraversalOptions,
) -> Result<SummaryNode> {
    Traversal::new(root, lens, oracle, filter, options).run()
}

fn folder_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
