//! Configuration management for the CLI.
//!
//! A run is configured by an optional `tariff.toml` in the base directory:
//!
//! ```toml
//! [settings]
//! fallback_ruling_ids = ["N340865", "N340183"]
//! include_vs_bench = true
//!
//! [llm]
//! provider = "deepinfra"
//! model = "meta-llama/Meta-Llama-3.1-8B-Instruct"
//!
//! [extractor]
//! tariff_block_window = 30
//!
//! [[providers]]
//! name = "local"
//! base_url = "http://localhost:8080/v1"
//! api_key_env = "LOCAL_LLM_KEY"
//! model = "qwen2.5-7b-instruct"
//! ```

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tariff_extractor::ExtractorConfig;
use tariff_llm::{ProviderConfig, ProviderRegistry};
use tracing::debug;

/// File name looked up in the base directory.
pub const CONFIG_FILE: &str = "tariff.toml";

/// Ruling ids used when no ids file exists.
pub const FALLBACK_RULING_IDS: [&str; 4] = ["N340865", "N340183", "N339572", "N275583"];

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Pipeline settings
    #[serde(default)]
    pub settings: Settings,

    /// LLM extraction settings
    #[serde(default)]
    pub llm: LlmSettings,

    /// Regex heuristics tuning
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Extra OpenAI-compatible endpoints, added to the built-in presets
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
}

/// Pipeline settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Ruling ids processed when `in/02_rulings` has no ids file
    #[serde(default = "default_fallback_ids")]
    pub fallback_ruling_ids: Vec<String>,

    /// Flag fields where either method differs from the benchmark
    #[serde(default = "default_true")]
    pub include_vs_bench: bool,

    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,
}

/// LLM extraction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Registry name of the provider
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model override; the provider's default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Upper bound for one ruling's extraction, in seconds
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,
}

impl Config {
    /// Load `tariff.toml` from the base directory, or defaults when absent.
    pub fn load(base_dir: &Path) -> Result<Self> {
        let path = base_dir.join(CONFIG_FILE);
        if path.exists() {
            Self::load_from(&path)
        } else {
            debug!("No {} in {}, using defaults", CONFIG_FILE, base_dir.display());
            Ok(Self::default())
        }
    }

    /// Load and validate a configuration file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        self.extractor.validate()?;
        if self.llm.timeout_secs == 0 {
            return Err(CliError::Config(
                "llm.timeout_secs must be greater than 0".to_string(),
            ));
        }
        for provider in &self.providers {
            provider.validate()?;
        }
        Ok(())
    }

    /// Built-in presets plus the configured providers.
    pub fn registry(&self) -> Result<ProviderRegistry> {
        let mut registry = ProviderRegistry::with_defaults();
        for provider in &self.providers {
            registry.register(provider.clone())?;
        }
        Ok(registry)
    }

    /// Resolve the provider to use, applying a model override.
    ///
    /// `provider` and `model` come from the command line and take precedence
    /// over the `[llm]` table.
    pub fn resolve_provider(
        &self,
        provider: Option<&str>,
        model: Option<&str>,
    ) -> Result<ProviderConfig> {
        let name = provider.unwrap_or(&self.llm.provider);
        let mut config = self.registry()?.get(name)?.clone();
        if let Some(model) = model.or(self.llm.model.as_deref()) {
            config = config.with_model(model);
        }
        Ok(config)
    }

    /// LLM timeout as a Duration.
    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm.timeout_secs)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fallback_ruling_ids: default_fallback_ids(),
            include_vs_bench: true,
            color: true,
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            timeout_secs: default_llm_timeout_secs(),
        }
    }
}

fn default_fallback_ids() -> Vec<String> {
    FALLBACK_RULING_IDS.iter().map(|id| id.to_string()).collect()
}

fn default_true() -> bool {
    true
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_llm_timeout_secs() -> u64 {
    120
}
