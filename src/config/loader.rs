//! Config file loading

use crate::domain::Config;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_SECTION: &str = "repo-digest";

const CONFIG_CANDIDATES: &[&str] = &[
    "repo-digest.toml",
    ".repo-digest.toml",
    "repo-digest.yml",
    ".repo-digest.yml",
    "repo-digest.yaml",
    ".repo-digest.yaml",
];

/// Load the config for `repo_root`.
///
/// An explicit `config_path` must parse. An auto-discovered file that fails to
/// parse is reported as a warning and defaults are used instead.
pub fn load_config(repo_root: &Path, config_path: Option<&Path>) -> Result<Config> {
    let config_path_provided = config_path.is_some();

    let discovered = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => discover_config(repo_root),
    };

    let Some(config_file) = discovered else {
        return Ok(Config::default());
    };

    let content = fs::read_to_string(&config_file)
        .with_context(|| format!("Failed reading config file: {}", config_file.display()))?;

    let ext = config_file.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "toml" => parse_toml_config(&content, &config_file),
        "yaml" | "yml" => parse_yaml_config(&content, &config_file),
        other => Err(anyhow::anyhow!(
            "Unsupported config extension '.{}' for file {}",
            other,
            config_file.display()
        )),
    };

    match parsed {
        Ok(cfg) => {
            tracing::debug!("loaded config from {}", config_file.display());
            Ok(cfg)
        }
        Err(e) if config_path_provided => Err(e),
        Err(e) => {
            tracing::warn!(
                "Failed to parse auto-discovered config {}: {:#}",
                config_file.display(),
                e
            );
            Ok(Config::default())
        }
    }
}

/// Parse TOML config, honoring a nested `[repo-digest]` section.
fn parse_toml_config(content: &str, config_file: &Path) -> Result<Config> {
    let raw: toml::Value = toml::from_str(content)
        .with_context(|| format!("Invalid TOML syntax: {}", config_file.display()))?;

    let config_val = match raw.get(CONFIG_SECTION) {
        Some(nested) => nested.clone(),
        None => raw,
    };

    config_val.try_into().with_context(|| format!("Invalid TOML config: {}", config_file.display()))
}

/// Parse YAML config, honoring a nested `repo-digest:` mapping.
fn parse_yaml_config(content: &str, config_file: &Path) -> Result<Config> {
    let raw: serde_yaml::Value = serde_yaml::from_str(content)
        .with_context(|| format!("Invalid YAML syntax: {}", config_file.display()))?;

    // An empty document deserializes as null.
    if raw.is_null() {
        return Ok(Config::default());
    }

    let config_val = match raw.get(CONFIG_SECTION) {
        Some(nested) => nested.clone(),
        None => raw,
    };

    serde_yaml::from_value(config_val)
        .with_context(|| format!("Invalid YAML config: {}", config_file.display()))
}

fn discover_config(repo_root: &Path) -> Option<PathBuf> {
    CONFIG_CANDIDATES.iter().map(|candidate| repo_root.join(candidate)).find(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::DEFAULT_MAX_DEPTH;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_config_defaults_when_missing() {
        let tmp = TempDir::new().expect("tmp");
        let cfg = load_config(tmp.path(), None).expect("config");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn test_load_toml_config() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(
            tmp.path().join("repo-digest.toml"),
            "max_depth = 2\nlenses = [\"security\"]\n\n[model]\nname = \"llama3\"\n",
        )
        .expect("write");

        let cfg = load_config(tmp.path(), None).expect("config");
        assert_eq!(cfg.max_depth, 2);
        assert_eq!(cfg.lenses, vec!["security"]);
        assert_eq!(cfg.model.name, "llama3");
        assert_eq!(cfg.model.provider, "openai");
    }

    #[test]
    fn test_nested_toml_section() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(
            tmp.path().join(".repo-digest.toml"),
            "[repo-digest]\nmax_chunks = 12\n\n[repo-digest.model]\nprovider = \"offline\"\n",
        )
        .expect("write");

        let cfg = load_config(tmp.path(), None).expect("config");
        assert_eq!(cfg.max_chunks, 12);
        assert_eq!(cfg.model.provider, "offline");
    }

    #[test]
    fn test_load_yaml_config_with_nested_section() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(
            tmp.path().join("repo-digest.yml"),
            "repo-digest:\n  lenses: security, data-flow\n  dedupe_indices: true\n",
        )
        .expect("write");

        let cfg = load_config(tmp.path(), None).expect("config");
        assert_eq!(cfg.lenses, vec!["security", "data-flow"]);
        assert!(cfg.dedupe_indices);
    }

    #[test]
    fn test_empty_yaml_gives_defaults() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("custom.yaml");
        fs::write(&path, "").expect("write");
        let cfg = load_config(tmp.path(), Some(&path)).expect("config");
        assert_eq!(cfg.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_explicit_config_invalid_type_returns_err() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("bad.toml");
        fs::write(&path, "source_extensions = 123\n").expect("write");

        let result = load_config(tmp.path(), Some(&path));
        assert!(result.is_err(), "explicit config with invalid type should return Err");
    }

    #[test]
    fn test_explicit_config_mixed_type_list_returns_err() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("bad.toml");
        fs::write(&path, "lenses = [\"security\", 123]\n").expect("write");

        let result = load_config(tmp.path(), Some(&path));
        assert!(result.is_err(), "explicit config with mixed-type list should return Err");
    }

    #[test]
    fn test_explicit_config_unsupported_extension_returns_err() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("settings.ini");
        fs::write(&path, "max_depth=3\n").expect("write");

        assert!(load_config(tmp.path(), Some(&path)).is_err());
    }

    #[test]
    fn test_auto_discovered_invalid_type_returns_default() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join("repo-digest.toml"), "max_depth = \"deep\"\n").expect("write");

        let cfg = load_config(tmp.path(), None).expect("should not error on auto-discovery");
        assert_eq!(cfg.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_auto_discovered_bad_syntax_returns_default() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join("repo-digest.yaml"), "lenses: [unclosed\n").expect("write");

        let cfg = load_config(tmp.path(), None).expect("should not error on auto-discovery");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn test_glob_normalization_comma_separated() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("digest.toml");
        fs::write(&path, "exclude_globs = \"gen/**, *.pb.go ,  vendor/**\"\n").expect("write");

        let cfg = load_config(tmp.path(), Some(&path)).expect("config");
        let globs: std::collections::HashSet<String> = cfg.exclude_globs.into_iter().collect();
        assert!(globs.contains("gen/**"), "should contain gen/**");
        assert!(globs.contains("*.pb.go"), "should contain *.pb.go");
        assert!(globs.contains("vendor/**"), "should contain vendor/**");
    }
}
