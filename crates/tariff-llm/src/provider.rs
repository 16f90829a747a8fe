//! Provider configuration
//!
//! Every OpenAI-compatible endpoint is described by a [`ProviderConfig`]
//! value and looked up by name in a [`ProviderRegistry`]. Nothing here is
//! process-global, so tests and callers can register their own endpoints.

use crate::error::LlmError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Default model for the OpenAI preset
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-5-nano-2025-08-07";

/// Default model for the DeepInfra preset
pub const DEFAULT_DEEPINFRA_MODEL: &str = "meta-llama/Meta-Llama-3.1-70B-Instruct";

/// Connection settings for one OpenAI-compatible chat completions API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Registry key ("openai", "deepinfra", ...)
    pub name: String,

    /// API root; `/chat/completions` is appended
    pub base_url: String,

    /// Environment variable holding the bearer token
    pub api_key_env: String,

    /// Model identifier sent with each request
    pub model: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Attempts per call, including the first
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_timeout_secs() -> u64 {
    90
}

/// Upper bound on `max_retries`
pub const MAX_RETRIES: u32 = 10;

fn default_max_retries() -> u32 {
    3
}

impl ProviderConfig {
    /// OpenAI preset
    pub fn openai() -> Self {
        Self {
            name: "openai".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }

    /// DeepInfra preset (OpenAI-compatible endpoint)
    pub fn deepinfra() -> Self {
        Self {
            name: "deepinfra".to_string(),
            base_url: "https://api.deepinfra.com/v1/openai".to_string(),
            api_key_env: "DEEPINFRA_API_KEY".to_string(),
            model: DEFAULT_DEEPINFRA_MODEL.to_string(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }

    /// Override the model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Full chat completions URL
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), LlmError> {
        if self.name.trim().is_empty() {
            return Err(LlmError::Config("provider name must not be empty".to_string()));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(LlmError::Config(format!(
                "base_url for '{}' must start with http:// or https://",
                self.name
            )));
        }
        if self.model.trim().is_empty() {
            return Err(LlmError::Config(format!("model for '{}' must not be empty", self.name)));
        }
        if self.timeout_secs == 0 {
            return Err(LlmError::Config("timeout_secs must be greater than 0".to_string()));
        }
        if self.max_retries == 0 || self.max_retries > MAX_RETRIES {
            return Err(LlmError::Config(format!(
                "max_retries must be between 1 and {}",
                MAX_RETRIES
            )));
        }
        Ok(())
    }

    /// Read the API key from the configured environment variable
    pub fn api_key(&self) -> Result<String, LlmError> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| LlmError::MissingApiKey(self.api_key_env.clone()))
    }
}

/// Named provider configurations
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    providers: BTreeMap<String, ProviderConfig>,
}

impl ProviderRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the `openai` and `deepinfra` presets
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.providers.insert("openai".to_string(), ProviderConfig::openai());
        registry.providers.insert("deepinfra".to_string(), ProviderConfig::deepinfra());
        registry
    }

    /// Add or replace a provider after validating it
    pub fn register(&mut self, config: ProviderConfig) -> Result<(), LlmError> {
        config.validate()?;
        self.providers.insert(config.name.clone(), config);
        Ok(())
    }

    /// Look up a provider by name
    pub fn get(&self, name: &str) -> Result<&ProviderConfig, LlmError> {
        self.providers.get(name).ok_or_else(|| LlmError::UnknownProvider {
            name: name.to_string(),
            available: self.names().join(", "),
        })
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.providers.keys().map(String::as_str).collect()
    }
}
