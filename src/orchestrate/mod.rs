//! One independent traversal per requested lens.

use crate::domain::{Config, PerLensResult, SummaryNode};
use crate::oracle::ModelOracle;
use crate::scan::EntryFilter;
use crate::traverse::{summarize_tree, TraversalOptions};
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::path::Path;

pub struct Orchestrator<'a> {
    oracle: &'a dyn ModelOracle,
    filter: EntryFilter,
    options: TraversalOptions,
    parallel_lenses: bool,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        oracle: &'a dyn ModelOracle,
        filter: EntryFilter,
        options: TraversalOptions,
    ) -> Self {
        Self { oracle, filter, options, parallel_lenses: false }
    }

    /// Validate `config` and build an orchestrator that splits files into
    /// chunks of at most `max_chunk_chars`.
    pub fn from_config(
        config: &Config,
        oracle: &'a dyn ModelOracle,
        max_chunk_chars: usize,
    ) -> Result<Self> {
        config.validate()?;
        let filter = EntryFilter::from_config(config)?;
        let options = TraversalOptions {
            max_depth: config.max_depth,
            max_chunks: config.max_chunks,
            max_chunk_chars,
            dedupe_indices: config.dedupe_indices,
        };
        Ok(Self::new(oracle, filter, options).parallel_lenses(config.parallel_lenses))
    }

    pub fn parallel_lenses(mut self, parallel: bool) -> Self {
        self.parallel_lenses = parallel;
        self
    }

    pub fn options(&self) -> &TraversalOptions {
        &self.options
    }

    pub fn run(&self, root: &Path, lenses: &[String]) -> Result<PerLensResult> {
        let lenses = dedupe_lenses(lenses)?;
        if !root.exists() {
            anyhow::bail!("Path does not exist: {}", root.display());
        }
        let root = root
            .canonicalize()
            .with_context(|| format!("Failed to resolve path: {}", root.display()))?;

        tracing::info!(
            "summarizing {} for {} lens(es), max depth {}, {} chars per chunk",
            root.display(),
            lenses.len(),
            self.options.max_depth,
            self.options.max_chunk_chars
        );

        let trees = if self.parallel_lenses {
            lenses
                .par_iter()
                .map(|lens| self.run_lens(&root, lens))
                .collect::<Result<Vec<_>>>()?
        } else {
            lenses.iter().map(|lens| self.run_lens(&root, lens)).collect::<Result<Vec<_>>>()?
        };

        let mut result = PerLensResult::new();
        for (lens, tree) in lenses.into_iter().zip(trees) {
            result.insert(lens, tree);
        }
        Ok(result)
    }

    fn run_lens(&self, root: &Path, lens: &str) -> Result<SummaryNode> {
        summarize_tree(root, lens, self.oracle, &self.filter, &self.options)
            .with_context(|| format!("Summarization failed for lens '{}'", lens))
    }
}

/// Trimmed lens names, first occurrence kept. Empty input or a blank name is an error.
pub fn dedupe_lenses(lenses: &[String]) -> Result<Vec<String>> {
    if lenses.is_empty() {
        anyhow::bail!("At least one lens must be requested");
    }
    let mut unique: Vec<String> = Vec::with_capacity(lenses.len());
    for lens in lenses {
        let lens = lens.trim();
        if lens.is_empty() {
            anyhow::bail!("Lens names must not be empty");
        }
        if !unique.iter().any(|seen| seen == lens) {
            unique.push(lens.to_string());
        }
    }
    Ok(unique)
}
