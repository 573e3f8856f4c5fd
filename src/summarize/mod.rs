//! Reduction of ranked chunks and child summaries to a single summary.
//!
//! Model failures never escape: they come back as the in-band
//! [`summary_error`](crate::domain::summary_error) string.

use crate::domain::{summary_error, RankedChunk, SummaryNode};
use crate::oracle::ModelOracle;
use crate::prompt::{file_summary_prompt, folder_summary_prompt};
use crate::utils::truncate_chars;

pub const TOP_RANKED_CHUNKS: usize = 5;
pub const CHILD_SUMMARY_CHARS: usize = 500;

/// Summarize a file from its ranked chunks, in the order the ranker produced.
pub fn summarize(ranked: &[RankedChunk], lens: &str, oracle: &dyn ModelOracle) -> String {
    let context = ranked
        .iter()
        .take(TOP_RANKED_CHUNKS)
        .map(|entry| format!("{}: {}\n{}", entry.score, entry.reason, entry.chunk))
        .collect::<Vec<_>>()
        .join("\n\n");

    generate_or_sentinel(oracle, &file_summary_prompt(lens, &context))
}

/// Fold the retained children of a folder into one summary.
pub fn summarize_folder(
    folder_name: &str,
    children: &[SummaryNode],
    lens: &str,
    oracle: &dyn ModelOracle,
) -> String {
    let pairs: Vec<(String, String)> = children
        .iter()
        .map(|child| {
            (child.name(), truncate_chars(&child.summary, CHILD_SUMMARY_CHARS).to_string())
        })
        .collect();

    generate_or_sentinel(oracle, &folder_summary_prompt(lens, folder_name, &pairs))
}

fn generate_or_sentinel(oracle: &dyn ModelOracle, prompt: &str) -> String {
    match oracle.generate(prompt) {
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            tracing::warn!("summarization call failed: {}", e);
            summary_error(e)
        }
    }
}
