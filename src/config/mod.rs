//! Configuration loading and merging
//!
//! Handles loading from config files, environment variables, and CLI arguments
//! with precedence CLI > Env > File > Defaults. Environment values arrive
//! through clap's `env` fallbacks, so they merge as CLI values.

pub mod loader;
pub mod merge;

pub use loader::load_config;
pub use merge::{merge_cli_with_config, CliOverrides};
