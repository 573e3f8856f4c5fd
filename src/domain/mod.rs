//! Core data types shared by the summarization pipeline.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::path::PathBuf;

pub mod config;

pub use config::{Config, ModelConfig};

/// Summary of a file that is not source code. Parents filter on this prefix.
pub const SKIPPED_SUMMARY: &str = "[skipped]";
pub const DEPTH_LIMIT_SUMMARY: &str = "[depth limit reached]";
pub const EMPTY_FILE_SUMMARY: &str = "[empty file]";
pub const EMPTY_FOLDER_SUMMARY: &str = "[empty folder]";
pub const SUMMARY_ERROR_PREFIX: &str = "Error in summarization";

/// Returns true when `summary` is the skip sentinel.
pub fn is_skipped(summary: &str) -> bool {
    summary.starts_with(SKIPPED_SUMMARY)
}

/// Returns true for any of the in-band sentinel strings.
pub fn is_sentinel(summary: &str) -> bool {
    is_skipped(summary)
        || summary == DEPTH_LIMIT_SUMMARY
        || summary == EMPTY_FILE_SUMMARY
        || summary == EMPTY_FOLDER_SUMMARY
        || summary.starts_with(SUMMARY_ERROR_PREFIX)
}

/// Build the in-band string standing in for a failed model call.
pub fn summary_error(cause: impl std::fmt::Display) -> String {
    format!("{}: {}", SUMMARY_ERROR_PREFIX, cause)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Folder,
}

/// Result of summarizing one file or folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryNode {
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub kind: NodeKind,
    #[serde(default)]
    pub children: Vec<SummaryNode>,
}

impl SummaryNode {
    pub fn file(path: PathBuf, summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            path: Some(path),
            kind: NodeKind::File,
            children: Vec::new(),
        }
    }

    pub fn folder(path: PathBuf, summary: impl Into<String>, children: Vec<SummaryNode>) -> Self {
        Self { summary: summary.into(), path: Some(path), kind: NodeKind::Folder, children }
    }

    /// Synthetic node returned once the depth budget is exhausted.
    pub fn depth_limit(kind: NodeKind) -> Self {
        Self { summary: DEPTH_LIMIT_SUMMARY.to_string(), path: None, kind, children: Vec::new() }
    }

    /// Last path component, or an empty string for synthetic nodes.
    pub fn name(&self) -> String {
        self.path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn is_skipped(&self) -> bool {
        is_skipped(&self.summary)
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SummaryNode::node_count).sum::<usize>()
    }
}

/// A chunk resolved from the model's ranking reply.
///
/// `chunk` is always copied out of the original chunk list by `index`; the
/// model is never trusted to reproduce chunk text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedChunk {
    pub index: usize,
    pub chunk: String,
    pub score: f64,
    pub reason: String,
}

/// Per-lens summary trees, keyed by lens name in request order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerLensResult {
    entries: Vec<(String, SummaryNode)>,
}

impl PerLensResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tree for `lens`. A repeated lens replaces the earlier tree in place.
    pub fn insert(&mut self, lens: impl Into<String>, root: SummaryNode) {
        let lens = lens.into();
        if let Some(slot) = self.entries.iter_mut().find(|(name, _)| *name == lens) {
            slot.1 = root;
        } else {
            self.entries.push((lens, root));
        }
    }

    pub fn get(&self, lens: &str) -> Option<&SummaryNode> {
        self.entries.iter().find(|(name, _)| name == lens).map(|(_, node)| node)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SummaryNode)> {
        self.entries.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn lenses(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for PerLensResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (lens, node) in &self.entries {
            map.serialize_entry(lens, node)?;
        }
        map.end()
    }
}
