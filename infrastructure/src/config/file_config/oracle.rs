//! Oracle configuration from TOML (`[oracle]` and `[verifier]` sections)

use crate::oracle::OpenAiOracleConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tq_domain::Model;

/// Raw search oracle configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOracleConfig {
    /// Model name sent to the endpoint
    pub model: String,
    /// Base URL of an OpenAI-compatible API
    pub api_url: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    pub temperature: f64,
    pub top_p: Option<f64>,
    pub max_tokens: Option<u32>,
    pub timeout_seconds: u64,
    /// Transport-level retries for rate limits, timeouts and 5xx
    pub max_retries: u32,
}

impl Default for FileOracleConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            api_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            temperature: 1.0,
            top_p: None,
            max_tokens: None,
            timeout_seconds: 120,
            max_retries: 2,
        }
    }
}

impl FileOracleConfig {
    pub fn to_oracle_config(&self) -> OpenAiOracleConfig {
        OpenAiOracleConfig {
            model: Model::from(self.model.as_str()),
            api_url: self.api_url.trim_end_matches('/').to_string(),
            api_key: std::env::var(&self.api_key_env).ok(),
            temperature: self.temperature,
            top_p: self.top_p,
            max_tokens: self.max_tokens,
            timeout: Duration::from_secs(self.timeout_seconds),
            max_retries: self.max_retries,
            ..OpenAiOracleConfig::default()
        }
    }
}

/// Raw verifier configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileVerifierConfig {
    /// Model override; the search model when unset
    pub model: Option<String>,
    pub temperature: f64,
    pub top_p: Option<f64>,
}

impl Default for FileVerifierConfig {
    fn default() -> Self {
        Self {
            model: None,
            temperature: 0.5,
            top_p: Some(0.5),
        }
    }
}
