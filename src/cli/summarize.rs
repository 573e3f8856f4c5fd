//! Summarize command implementation

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::utils::csv_list;
use crate::budget::{chars_for_tokens, resolve_context_window};
use crate::config::{load_config, merge_cli_with_config, CliOverrides};
use crate::oracle::build_oracle;
use crate::orchestrate::Orchestrator;
use crate::render::{render_json, render_tree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Tree,
    Json,
}

#[derive(Args)]
pub struct SummarizeArgs {
    /// File or directory to summarize
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Analytical lens (repeatable or comma-separated), e.g. security
    #[arg(short = 'l', long = "lens", value_name = "LENS", value_delimiter = ',')]
    pub lenses: Vec<String>,

    /// Maximum recursion depth below PATH
    #[arg(short = 'd', long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Maximum chunks per file
    #[arg(long, value_name = "N")]
    pub max_chunks: Option<usize>,

    /// Maximum characters per chunk (overrides the model-derived budget)
    #[arg(long, value_name = "N")]
    pub max_chunk_chars: Option<usize>,

    /// Model name
    #[arg(short = 'm', long, env = "REPO_DIGEST_MODEL", value_name = "MODEL")]
    pub model: Option<String>,

    /// Model provider: openai or offline
    #[arg(long, env = "REPO_DIGEST_PROVIDER", value_name = "PROVIDER")]
    pub provider: Option<String>,

    /// Base URL of an OpenAI-compatible API
    #[arg(long, env = "REPO_DIGEST_BASE_URL", value_name = "URL")]
    pub base_url: Option<String>,

    /// Config file path (default: auto-discovered in PATH)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Tree)]
    pub format: OutputFormat,

    /// Write output to FILE instead of stdout
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Run lenses concurrently
    #[arg(long)]
    pub parallel_lenses: bool,

    /// Keep only the first ranking entry per chunk index
    #[arg(long)]
    pub dedupe_indices: bool,

    /// Exclude paths matching these globs (comma-separated)
    #[arg(short = 'e', long, value_name = "GLOBS")]
    pub exclude_glob: Option<String>,

    /// Treat only these extensions as source (comma-separated)
    #[arg(short = 'i', long, value_name = "EXTS")]
    pub include_ext: Option<String>,

    /// Skip files larger than this (bytes)
    #[arg(long, value_name = "BYTES")]
    pub max_file_bytes: Option<u64>,
}

pub fn run(args: SummarizeArgs) -> Result<()> {
    if !args.path.exists() {
        anyhow::bail!("Path does not exist: {}", args.path.display());
    }
    let root = args
        .path
        .canonicalize()
        .with_context(|| format!("Failed to resolve path: {}", args.path.display()))?;
    let config_anchor = if root.is_dir() { root.clone() } else { parent_or_cwd(&root)? };

    let file_config = load_config(&config_anchor, args.config.as_deref())?;
    let cli_overrides = CliOverrides {
        lenses: Some(args.lenses.clone()),
        max_depth: args.max_depth,
        max_chunks: args.max_chunks,
        max_chunk_chars: args.max_chunk_chars,
        model: args.model.clone(),
        provider: args.provider.clone(),
        base_url: args.base_url.clone(),
        exclude_globs: csv_list(args.exclude_glob.as_deref()),
        source_extensions: csv_list(args.include_ext.as_deref()),
        max_file_bytes: args.max_file_bytes,
        dedupe_indices: if args.dedupe_indices { Some(true) } else { None },
        parallel_lenses: if args.parallel_lenses { Some(true) } else { None },
    };
    let config = merge_cli_with_config(file_config, cli_overrides);
    config.validate()?;

    let provider = build_oracle(&config.model).context("Failed to configure model provider")?;
    tracing::info!("using {} provider with model {}", provider.name(), config.model.name);
    let max_chunk_chars = match config.max_chunk_chars {
        Some(chars) => chars,
        None => {
            let window = resolve_context_window(&config.model.name, Some(&provider));
            tracing::debug!(
                "context window for {}: {} tokens ({})",
                config.model.name,
                window.tokens,
                window.source
            );
            chars_for_tokens(window.tokens)
        }
    };

    let orchestrator = Orchestrator::from_config(&config, &provider, max_chunk_chars)?;

    let spinner = spinner(&format!(
        "Summarizing {} with {} ({} lens(es))",
        root.display(),
        config.model.name,
        config.lenses.len()
    ));
    let result = orchestrator.run(&root, &config.lenses);
    spinner.finish_and_clear();
    let result = result?;

    let rendered = match args.format {
        OutputFormat::Tree => {
            let styled = args.output.is_none() && console::Term::stdout().is_term();
            render_tree(&result, styled)
        }
        OutputFormat::Json => render_json(&root, &result)?,
    };

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create output directory: {}", parent.display())
                })?;
            }
            fs::write(path, &rendered)
                .with_context(|| format!("Failed to write output: {}", path.display()))?;
            let nodes: usize = result.iter().map(|(_, node)| node.node_count()).sum();
            eprintln!(
                "Wrote {} lens summary tree(s), {} nodes, to {}",
                result.len(),
                nodes,
                path.display()
            );
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

fn parent_or_cwd(path: &Path) -> Result<PathBuf> {
    match path.parent() {
        Some(parent) => Ok(parent.to_path_buf()),
        None => Ok(std::env::current_dir()?),
    }
}

/// Spinner on stderr; hidden when stderr is not a terminal.
fn spinner(message: &str) -> ProgressBar {
    if !console::Term::stderr().is_term() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    let template = "{spinner:.green} {msg} [{elapsed}]";
    if let Ok(style) = ProgressStyle::default_spinner().template(template) {
        bar.set_style(style);
    }
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}
