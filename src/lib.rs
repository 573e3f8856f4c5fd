//! repo-digest: recursive, lens-driven repository summarization.
//!
//! A source tree is walked depth-first. Each source file is split into
//! bounded chunks, the chunks are ranked by a language model for the requested
//! lens, and the best ones are reduced to a file summary. Folder summaries are
//! folded from their children's summaries, up to the root.
//!
//! The model is reached through the [`oracle::ModelOracle`] trait; every other
//! component is deterministic.

pub mod budget;
pub mod chunk;
pub mod cli;
pub mod config;
pub mod domain;
pub mod oracle;
pub mod orchestrate;
pub mod prompt;
pub mod rank;
pub mod render;
pub mod scan;
pub mod summarize;
pub mod traverse;
pub mod utils;

pub use domain::{Config, ModelConfig, NodeKind, PerLensResult, RankedChunk, SummaryNode};
pub use oracle::{ContextWindowSource, ModelOracle, OracleError};

use anyhow::Result;
use std::path::Path;

/// Summarize `root` for every lens in `config`.
///
/// Uses `config.max_chunk_chars` when set, otherwise the budget for
/// `config.model.name` from the built-in context-window table.
pub fn summarize_repository(
    root: &Path,
    config: &Config,
    oracle: &dyn ModelOracle,
) -> Result<PerLensResult> {
    let max_chunk_chars =
        config.max_chunk_chars.unwrap_or_else(|| budget::chunk_budget(&config.model.name, None));
    orchestrate::Orchestrator::from_config(config, oracle, max_chunk_chars)?
        .run(root, &config.lenses)
}
