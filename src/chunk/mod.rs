//! Bounded-size chunking of file content.
//!
//! Tiers, in order:
//! 1. a structural pass ([`StructuralSplitter`]) yields top-level declarations,
//!    each over-long declaration re-split by [`text_splitter::split_bounded`]
//! 2. without declarations, [`LineChunker`] groups lines at declaration-like starts
//! 3. when more than `max_chunks` chunks remain, contiguous chunks are merged
//!    into buckets
//!
//! Every returned chunk is trimmed, non-empty and at most `max_chunk_chars`
//! characters long. Output is a pure function of the inputs.

use crate::utils::char_len;
use std::path::Path;

pub mod code_chunker;
pub mod line_chunker;
pub mod text_splitter;

pub use code_chunker::CodeChunker;
pub use line_chunker::LineChunker;
pub use text_splitter::split_bounded;

const BUCKET_SEPARATOR: &str = "\n\n";

/// Result of a structural pass over a file's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Structure {
    /// Literal source text of each top-level declaration, in source order.
    Declarations(Vec<String>),
    Unavailable,
}

/// Pluggable syntax-aware declaration extraction.
pub trait StructuralSplitter {
    fn split(&self, content: &str) -> Structure;
}

/// Splitter that never finds structure; forces the line heuristic.
pub struct NoStructure;

impl StructuralSplitter for NoStructure {
    fn split(&self, _content: &str) -> Structure {
        Structure::Unavailable
    }
}

/// Chunk text with no syntax awareness.
pub fn split(content: &str, max_chunks: usize, max_chunk_chars: usize) -> Vec<String> {
    split_with(&NoStructure, content, max_chunks, max_chunk_chars)
}

/// Chunk a file's content, picking a grammar from the path's extension.
pub fn split_file(
    path: &Path,
    content: &str,
    max_chunks: usize,
    max_chunk_chars: usize,
) -> Vec<String> {
    split_with(&CodeChunker::for_path(path), content, max_chunks, max_chunk_chars)
}

pub fn split_with(
    splitter: &dyn StructuralSplitter,
    content: &str,
    max_chunks: usize,
    max_chunk_chars: usize,
) -> Vec<String> {
    let max_chunks = max_chunks.max(1);
    let max_chunk_chars = max_chunk_chars.max(1);

    let mut chunks: Vec<String> = match splitter.split(content) {
        Structure::Declarations(declarations) => declarations
            .iter()
            .flat_map(|decl| split_bounded(decl, max_chunk_chars))
            .collect(),
        Structure::Unavailable => Vec::new(),
    };
    if chunks.is_empty() {
        chunks = LineChunker::new(max_chunk_chars).chunk(content);
    }

    bucket_chunks(chunks, max_chunks, max_chunk_chars)
}

/// Merge contiguous chunks until at most `max_chunks` remain.
///
/// Each pass groups up to `ceil(count / max_chunks)` neighbours, joined by a
/// blank line, without letting a bucket exceed `max_chunk_chars`. If the cap
/// blocks further merging, the trailing chunks are dropped.
pub fn bucket_chunks(
    chunks: Vec<String>,
    max_chunks: usize,
    max_chunk_chars: usize,
) -> Vec<String> {
    let max_chunks = max_chunks.max(1);
    let mut chunks = chunks;

    while chunks.len() > max_chunks {
        let before = chunks.len();
        let bucket_size = before.div_ceil(max_chunks);
        chunks = merge_buckets(chunks, bucket_size, max_chunk_chars);
        if chunks.len() >= before {
            break;
        }
    }

    if chunks.len() > max_chunks {
        tracing::warn!(
            "dropping {} trailing chunk(s): {} chunks cannot be merged under the {}-char cap",
            chunks.len() - max_chunks,
            chunks.len(),
            max_chunk_chars
        );
        chunks.truncate(max_chunks);
    }

    chunks
}

fn merge_buckets(chunks: Vec<String>, bucket_size: usize, max_chunk_chars: usize) -> Vec<String> {
    let separator_len = char_len(BUCKET_SEPARATOR);
    let mut merged = Vec::new();
    let mut bucket = String::new();
    let mut bucket_len = 0usize;
    let mut members = 0usize;

    for chunk in chunks {
        let chunk_len = char_len(&chunk);
        let fits = bucket_len + separator_len + chunk_len <= max_chunk_chars;
        if members > 0 && (members == bucket_size || !fits) {
            merged.push(std::mem::take(&mut bucket));
            bucket_len = 0;
            members = 0;
        }
        if members > 0 {
            bucket.push_str(BUCKET_SEPARATOR);
            bucket_len += separator_len;
        }
        bucket.push_str(&chunk);
        bucket_len += chunk_len;
        members += 1;
    }
    if members > 0 {
        merged.push(bucket);
    }

    merged
}
