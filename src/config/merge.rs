//! Layering command-line values over a loaded config.

use crate::domain::config::normalize_extension;
use crate::domain::Config;

/// Values given on the command line (or through their `env` fallbacks).
/// `None` leaves the file/default value in place.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub lenses: Option<Vec<String>>,
    pub max_depth: Option<usize>,
    pub max_chunks: Option<usize>,
    pub max_chunk_chars: Option<usize>,
    pub model: Option<String>,
    pub provider: Option<String>,
    pub base_url: Option<String>,
    pub exclude_globs: Option<Vec<String>>,
    pub source_extensions: Option<Vec<String>>,
    pub max_file_bytes: Option<u64>,
    pub dedupe_indices: Option<bool>,
    pub parallel_lenses: Option<bool>,
}

pub fn merge_cli_with_config(mut config: Config, cli: CliOverrides) -> Config {
    if let Some(lenses) = cli.lenses.filter(|l| !l.is_empty()) {
        config.lenses = lenses;
    }
    if let Some(depth) = cli.max_depth {
        config.max_depth = depth;
    }
    if let Some(max_chunks) = cli.max_chunks {
        config.max_chunks = max_chunks;
    }
    if cli.max_chunk_chars.is_some() {
        config.max_chunk_chars = cli.max_chunk_chars;
    }
    if let Some(model) = cli.model {
        config.model.name = model;
    }
    if let Some(provider) = cli.provider {
        config.model.provider = provider;
    }
    if let Some(base_url) = cli.base_url {
        config.model.base_url = base_url;
    }
    if let Some(globs) = cli.exclude_globs {
        config.exclude_globs = globs;
    }
    if let Some(extensions) = cli.source_extensions {
        config.source_extensions = extensions.iter().map(|e| normalize_extension(e)).collect();
    }
    if let Some(bytes) = cli.max_file_bytes {
        config.max_file_bytes = bytes;
    }
    if let Some(dedupe) = cli.dedupe_indices {
        config.dedupe_indices = dedupe;
    }
    if let Some(parallel) = cli.parallel_lenses {
        config.parallel_lenses = parallel;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_overrides_keep_file_values() {
        let file = Config { max_depth: 2, ..Config::default() };
        let merged = merge_cli_with_config(file.clone(), CliOverrides::default());
        assert_eq!(merged, file);
    }

    #[test]
    fn cli_values_win() {
        let file = Config { max_depth: 2, lenses: vec!["security".into()], ..Config::default() };
        let merged = merge_cli_with_config(
            file,
            CliOverrides {
                max_depth: Some(6),
                lenses: Some(vec!["performance".into()]),
                model: Some("llama3".into()),
                provider: Some("offline".into()),
                source_extensions: Some(vec!["RS".into()]),
                dedupe_indices: Some(true),
                ..CliOverrides::default()
            },
        );
        assert_eq!(merged.max_depth, 6);
        assert_eq!(merged.lenses, vec!["performance"]);
        assert_eq!(merged.model.name, "llama3");
        assert_eq!(merged.model.provider, "offline");
        assert_eq!(merged.source_extensions, vec![".rs"]);
        assert!(merged.dedupe_indices);
    }

    #[test]
    fn empty_lens_list_does_not_clear_config() {
        let merged = merge_cli_with_config(
            Config::default(),
            CliOverrides { lenses: Some(Vec::new()), ..CliOverrides::default() },
        );
        assert_eq!(merged.lenses, Config::default().lenses);
    }
}
