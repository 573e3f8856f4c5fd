//! Model-oracle capability: "given a prompt, return text".
//!
//! The engine treats the oracle as untrusted. Callers catch [`OracleError`]
//! and substitute in-band sentinel text; nothing here retries.

use crate::domain::ModelConfig;
use thiserror::Error;

pub mod http;
pub mod offline;

pub use http::HttpOracle;
pub use offline::OfflineOracle;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("API key not set: environment variable {0} is empty or missing")]
    MissingApiKey(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("model endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed model response: {0}")]
    MalformedResponse(String),

    #[error("unsupported provider '{0}' (expected 'openai' or 'offline')")]
    UnsupportedProvider(String),

    #[error("context window for '{0}' is not known to this provider")]
    UnknownContextWindow(String),
}

pub type OracleResult<T> = Result<T, OracleError>;

/// Text generation. One call, one reply; failures are reported, never retried.
pub trait ModelOracle: Send + Sync {
    fn generate(&self, prompt: &str) -> OracleResult<String>;
}

/// Optional discovery of a model's context window, in tokens.
pub trait ContextWindowSource: Send + Sync {
    fn lookup_context_window(&self, model_key: &str) -> OracleResult<u64>;
}

impl<T: ModelOracle + ?Sized> ModelOracle for &T {
    fn generate(&self, prompt: &str) -> OracleResult<String> {
        (**self).generate(prompt)
    }
}

impl<T: ModelOracle + ?Sized> ModelOracle for Box<T> {
    fn generate(&self, prompt: &str) -> OracleResult<String> {
        (**self).generate(prompt)
    }
}

/// A configured provider, usable both for generation and window discovery.
pub enum Provider {
    Http(HttpOracle),
    Offline(OfflineOracle),
}

impl Provider {
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Http(_) => "openai",
            Provider::Offline(_) => "offline",
        }
    }
}

impl ModelOracle for Provider {
    fn generate(&self, prompt: &str) -> OracleResult<String> {
        match self {
            Provider::Http(oracle) => oracle.generate(prompt),
            Provider::Offline(oracle) => oracle.generate(prompt),
        }
    }
}

impl ContextWindowSource for Provider {
    fn lookup_context_window(&self, model_key: &str) -> OracleResult<u64> {
        match self {
            Provider::Http(oracle) => oracle.lookup_context_window(model_key),
            Provider::Offline(oracle) => oracle.lookup_context_window(model_key),
        }
    }
}

/// Build the provider named by `config.provider`.
pub fn build_oracle(config: &ModelConfig) -> OracleResult<Provider> {
    match config.provider.to_ascii_lowercase().as_str() {
        "openai" | "openai-compatible" => Ok(Provider::Http(HttpOracle::from_config(config)?)),
        "offline" => Ok(Provider::Offline(OfflineOracle::new())),
        other => Err(OracleError::UnsupportedProvider(other.to_string())),
    }
}
