//! Budget command implementation

use anyhow::{Context, Result};
use clap::Args;

use crate::budget::{chars_for_tokens, resolve_context_window};
use crate::domain::ModelConfig;
use crate::oracle::{build_oracle, ContextWindowSource};

#[derive(Args)]
pub struct BudgetArgs {
    /// Model name, optionally prefixed with a provider (e.g. openai/gpt-4o)
    #[arg(short = 'm', long, env = "REPO_DIGEST_MODEL", value_name = "MODEL")]
    pub model: String,

    /// Ask the provider for the context window when the model is not in the built-in table
    #[arg(long)]
    pub discover: bool,

    /// Model provider used for discovery
    #[arg(long, env = "REPO_DIGEST_PROVIDER", value_name = "PROVIDER")]
    pub provider: Option<String>,

    /// Base URL of an OpenAI-compatible API used for discovery
    #[arg(long, env = "REPO_DIGEST_BASE_URL", value_name = "URL")]
    pub base_url: Option<String>,
}

pub fn run(args: BudgetArgs) -> Result<()> {
    let mut model = ModelConfig { name: args.model.clone(), ..ModelConfig::default() };
    if let Some(provider) = args.provider {
        model.provider = provider;
    }
    if let Some(base_url) = args.base_url {
        model.base_url = base_url;
    }

    let provider = if args.discover {
        Some(build_oracle(&model).context("Failed to configure model provider")?)
    } else {
        None
    };
    let discovery = provider.as_ref().map(|p| p as &dyn ContextWindowSource);
    let window = resolve_context_window(&args.model, discovery);

    println!("Model: {}", args.model);
    println!("Context window: {} tokens ({})", window.tokens, window.source);
    println!("Chunk budget: {} characters", chars_for_tokens(window.tokens));
    Ok(())
}
