//! Network-free oracle for dry runs.

use super::{ContextWindowSource, ModelOracle, OracleError, OracleResult};
use crate::utils::{collapse_whitespace, truncate_chars};

/// Replies with a deterministic digest of the prompt's last line.
///
/// Its replies are never valid ranking JSON, so a dry run exercises the
/// ranker's default-ranking path.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineOracle;

impl OfflineOracle {
    pub fn new() -> Self {
        Self
    }
}

impl ModelOracle for OfflineOracle {
    fn generate(&self, prompt: &str) -> OracleResult<String> {
        let tail = prompt.lines().rev().find(|line| !line.trim().is_empty()).unwrap_or("");
        let tail = collapse_whitespace(tail.trim());
        Ok(format!(
            "Offline summary of {} prompt lines ending with: {}",
            prompt.lines().count(),
            truncate_chars(&tail, 80)
        ))
    }
}

impl ContextWindowSource for OfflineOracle {
    fn lookup_context_window(&self, model_key: &str) -> OracleResult<u64> {
        Err(OracleError::UnknownContextWindow(model_key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replies_are_deterministic() {
        let oracle = OfflineOracle::new();
        let a = oracle.generate("line one\nline two\n").unwrap();
        let b = oracle.generate("line one\nline two\n").unwrap();
        assert_eq!(a, b);
        assert!(a.contains("line two"));
    }
}
