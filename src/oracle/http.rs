//! OpenAI-compatible chat-completions client.
//!
//! Sends a single `POST {base_url}/chat/completions` per prompt and returns
//! `choices[0].message.content`. Context windows come from
//! `GET {base_url}/models`, reading the first of `context_length`,
//! `context_window`, `max_model_len` or `max_context_length` on the matching
//! entry.

use super::{ContextWindowSource, ModelOracle, OracleError, OracleResult};
use crate::domain::ModelConfig;
use serde_json::{json, Value};
use std::time::Duration;

const CONTEXT_WINDOW_FIELDS: &[&str] =
    &["context_length", "context_window", "max_model_len", "max_context_length"];

pub struct HttpOracle {
    client: reqwest::blocking::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    temperature: f32,
    max_output_tokens: Option<u32>,
}

impl HttpOracle {
    pub fn from_config(config: &ModelConfig) -> OracleResult<Self> {
        let api_key = std::env::var(&config.api_key_env).ok().filter(|key| !key.trim().is_empty());
        if api_key.is_none() && config.base_url.contains("api.openai.com") {
            return Err(OracleError::MissingApiKey(config.api_key_env.clone()));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.name.clone(),
            api_key,
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        })
    }

    fn authorized(
        &self,
        builder: reqwest::blocking::RequestBuilder,
    ) -> reqwest::blocking::RequestBuilder {
        match &self.api_key {
            Some(key) => builder.header("Authorization", format!("Bearer {}", key)),
            None => builder,
        }
    }

    fn request_body(&self, prompt: &str) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": self.temperature,
        });
        if let Some(max_tokens) = self.max_output_tokens {
            body["max_tokens"] = json!(max_tokens);
        }
        body
    }
}

impl ModelOracle for HttpOracle {
    fn generate(&self, prompt: &str) -> OracleResult<String> {
        let url = format!("{}/chat/completions", self.base_url);
        tracing::debug!("model call: {} chars to {}", prompt.len(), url);

        let response =
            self.authorized(self.client.post(&url)).json(&self.request_body(prompt)).send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(OracleError::Status { status: status.as_u16(), body });
        }

        let json: Value = response.json()?;
        parse_completion(&json)
    }
}

impl ContextWindowSource for HttpOracle {
    fn lookup_context_window(&self, model_key: &str) -> OracleResult<u64> {
        let url = format!("{}/models", self.base_url);
        let response = self.authorized(self.client.get(&url)).send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(OracleError::Status { status: status.as_u16(), body });
        }

        let json: Value = response.json()?;
        parse_context_window(&json, model_key)
    }
}

/// Extract `choices[0].message.content` from a chat-completions reply.
pub fn parse_completion(json: &Value) -> OracleResult<String> {
    json.pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| {
            OracleError::MalformedResponse("missing choices[0].message.content".to_string())
        })
}

/// Find `model_key`'s context window in a `/models` listing.
pub fn parse_context_window(json: &Value, model_key: &str) -> OracleResult<u64> {
    let entries = json
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| OracleError::MalformedResponse("missing data array".to_string()))?;

    entries
        .iter()
        .find(|entry| entry.get("id").and_then(Value::as_str) == Some(model_key))
        .and_then(|entry| {
            CONTEXT_WINDOW_FIELDS
                .iter()
                .find_map(|field| entry.get(*field).and_then(Value::as_u64))
                .or_else(|| entry.pointer("/top_provider/context_length").and_then(Value::as_u64))
        })
        .filter(|tokens| *tokens > 0)
        .ok_or_else(|| OracleError::UnknownContextWindow(model_key.to_string()))
}
