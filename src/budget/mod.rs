//! Per-chunk character budget derived from a model's context window.

use crate::oracle::ContextWindowSource;
use std::fmt;

pub const DEFAULT_CONTEXT_TOKENS: u64 = 8192;
/// Share of the context window a single chunk may occupy.
pub const CHUNK_CONTEXT_FRACTION: f64 = 0.20;
pub const CHARS_PER_TOKEN: f64 = 4.0;
pub const MIN_CHUNK_CHARS: usize = 1000;

const KNOWN_CONTEXT_WINDOWS: &[(&str, u64)] = &[
    ("gpt-4o", 128_000),
    ("gpt-4o-mini", 128_000),
    ("gpt-4.1", 1_047_576),
    ("gpt-4.1-mini", 1_047_576),
    ("gpt-4.1-nano", 1_047_576),
    ("gpt-4-turbo", 128_000),
    ("gpt-4", 8_192),
    ("gpt-3.5-turbo", 16_385),
    ("o1", 200_000),
    ("o3-mini", 200_000),
    ("claude-3-5-sonnet", 200_000),
    ("claude-3-5-haiku", 200_000),
    ("claude-3-opus", 200_000),
    ("gemini-1.5-pro", 2_097_152),
    ("gemini-1.5-flash", 1_048_576),
    ("llama3", 8_192),
    ("llama3.1", 131_072),
    ("mistral", 32_768),
    ("mixtral", 32_768),
    ("qwen2.5-coder", 32_768),
    ("deepseek-coder", 16_384),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowSource {
    Table,
    Discovered,
    Default,
}

impl fmt::Display for WindowSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WindowSource::Table => "built-in table",
            WindowSource::Discovered => "provider discovery",
            WindowSource::Default => "default",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextWindow {
    pub tokens: u64,
    pub source: WindowSource,
}

/// Static table lookup: exact key first, then without a `provider/` prefix.
pub fn known_context_window(model_key: &str) -> Option<u64> {
    let lookup =
        |key: &str| KNOWN_CONTEXT_WINDOWS.iter().find(|(name, _)| *name == key).map(|(_, t)| *t);
    lookup(model_key).or_else(|| model_key.rsplit_once('/').and_then(|(_, bare)| lookup(bare)))
}

pub fn resolve_context_window(
    model_key: &str,
    discovery: Option<&dyn ContextWindowSource>,
) -> ContextWindow {
    if let Some(tokens) = known_context_window(model_key) {
        return ContextWindow { tokens, source: WindowSource::Table };
    }

    if let Some(source) = discovery {
        match source.lookup_context_window(model_key) {
            Ok(tokens) if tokens > 0 => {
                return ContextWindow { tokens, source: WindowSource::Discovered };
            }
            Ok(_) => tracing::warn!("provider reported an empty context window for {}", model_key),
            Err(e) => tracing::warn!("context window discovery failed for {}: {}", model_key, e),
        }
    }

    ContextWindow { tokens: DEFAULT_CONTEXT_TOKENS, source: WindowSource::Default }
}

/// `max(1000, floor(tokens * 4 * 0.20))`
pub fn chars_for_tokens(tokens: u64) -> usize {
    let chars = (tokens as f64 * CHARS_PER_TOKEN * CHUNK_CONTEXT_FRACTION).floor() as usize;
    chars.max(MIN_CHUNK_CHARS)
}

/// Character budget per chunk for `model_key`.
pub fn chunk_budget(model_key: &str, discovery: Option<&dyn ContextWindowSource>) -> usize {
    chars_for_tokens(resolve_context_window(model_key, discovery).tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{OracleError, OracleResult};

    struct FixedWindow(OracleResult<u64>);

    impl ContextWindowSource for FixedWindow {
        fn lookup_context_window(&self, model_key: &str) -> OracleResult<u64> {
            match &self.0 {
                Ok(tokens) => Ok(*tokens),
                Err(_) => Err(OracleError::UnknownContextWindow(model_key.to_string())),
            }
        }
    }

    #[test]
    fn table_models_use_table_window() {
        assert_eq!(chunk_budget("gpt-4o", None), 102_400);
        assert_eq!(known_context_window("openai/gpt-4o-mini"), Some(128_000));
    }

    #[test]
    fn unknown_model_uses_discovery() {
        let discovery = FixedWindow(Ok(32_000));
        let window = resolve_context_window("my-local-model", Some(&discovery));
        assert_eq!(window, ContextWindow { tokens: 32_000, source: WindowSource::Discovered });
        assert_eq!(chunk_budget("my-local-model", Some(&discovery)), 25_600);
    }

    #[test]
    fn discovery_failure_falls_back_to_default() {
        let discovery = FixedWindow(Err(OracleError::UnknownContextWindow(String::new())));
        let window = resolve_context_window("my-local-model", Some(&discovery));
        assert_eq!(window.source, WindowSource::Default);
        assert_eq!(chunk_budget("my-local-model", Some(&discovery)), 6553);
    }

    #[test]
    fn tiny_windows_get_the_floor() {
        assert_eq!(chars_for_tokens(100), MIN_CHUNK_CHARS);
        assert_eq!(chars_for_tokens(0), MIN_CHUNK_CHARS);
    }
}
