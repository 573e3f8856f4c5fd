//! Run configuration.

use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_MAX_DEPTH: usize = 4;
pub const DEFAULT_MAX_CHUNKS: usize = 40;
pub const DEFAULT_MAX_FILE_BYTES: u64 = 1_048_576;
pub const DEFAULT_LENSES: &[&str] = &["architecture"];

/// Model selection and per-call options, threaded into every component that
/// talks to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// `openai` (any OpenAI-compatible endpoint) or `offline`.
    pub provider: String,
    pub name: String,
    pub base_url: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    pub temperature: f32,
    pub max_output_tokens: Option<u32>,
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            name: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            temperature: 0.2,
            max_output_tokens: None,
            timeout_secs: 120,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub model: ModelConfig,
    #[serde(deserialize_with = "deserialize_string_list")]
    pub lenses: Vec<String>,
    pub max_depth: usize,
    pub max_chunks: usize,
    /// Overrides the budget derived from the model's context window.
    pub max_chunk_chars: Option<usize>,
    #[serde(deserialize_with = "deserialize_string_list")]
    pub exclude_globs: Vec<String>,
    /// Replaces the built-in source extension list when non-empty.
    #[serde(deserialize_with = "deserialize_extension_list")]
    pub source_extensions: Vec<String>,
    pub max_file_bytes: u64,
    pub dedupe_indices: bool,
    pub parallel_lenses: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            lenses: DEFAULT_LENSES.iter().map(|s| s.to_string()).collect(),
            max_depth: DEFAULT_MAX_DEPTH,
            max_chunks: DEFAULT_MAX_CHUNKS,
            max_chunk_chars: None,
            exclude_globs: Vec::new(),
            source_extensions: Vec::new(),
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            dedupe_indices: false,
            parallel_lenses: false,
        }
    }
}

impl Config {
    /// Reject settings that would make a run meaningless before any traversal starts.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.lenses.is_empty() {
            anyhow::bail!("At least one lens must be requested");
        }
        if let Some(lens) = self.lenses.iter().find(|l| l.trim().is_empty()) {
            anyhow::bail!("Invalid lens name: {:?}", lens);
        }
        if self.max_depth == 0 {
            anyhow::bail!("max_depth must be at least 1");
        }
        if self.max_chunks == 0 {
            anyhow::bail!("max_chunks must be at least 1");
        }
        if self.max_chunk_chars == Some(0) {
            anyhow::bail!("max_chunk_chars must be at least 1");
        }
        if self.model.name.trim().is_empty() {
            anyhow::bail!("A model name is required");
        }
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrList {
    One(String),
    Many(Vec<String>),
}

impl StringOrList {
    fn into_items(self) -> Vec<String> {
        let raw = match self {
            StringOrList::One(s) => s.split(',').map(str::to_string).collect(),
            StringOrList::Many(items) => items,
        };
        raw.into_iter().map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect()
    }
}

/// Accept either a list or a comma-separated string.
fn deserialize_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(StringOrList::deserialize(deserializer)?.into_items())
}

fn deserialize_extension_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(StringOrList::deserialize(deserializer)?
        .into_items()
        .into_iter()
        .map(|ext| normalize_extension(&ext))
        .collect())
}

/// Lowercase and add the leading dot: `"RS"` -> `".rs"`.
pub fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{}", ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        Config::default().validate().expect("defaults are valid");
    }

    #[test]
    fn zero_depth_is_rejected() {
        let cfg = Config { max_depth: 0, ..Config::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn blank_lens_is_rejected() {
        let cfg = Config { lenses: vec!["security".into(), "  ".into()], ..Config::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn comma_separated_lists_are_split() {
        let cfg: Config =
            toml::from_str("lenses = \"security, data-flow\"\nsource_extensions = \"RS, py\"\n")
                .expect("parse");
        assert_eq!(cfg.lenses, vec!["security", "data-flow"]);
        assert_eq!(cfg.source_extensions, vec![".rs", ".py"]);
    }
}
