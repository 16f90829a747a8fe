//! OpenAI-compatible Provider Implementation
//!
//! Talks to any Chat Completions API that follows the OpenAI wire format
//! (OpenAI, DeepInfra, Together.ai, a local llama.cpp server, ...).
//!
//! # Features
//!
//! - Async HTTP communication via `reqwest`
//! - Endpoint, model and key variable taken from a [`ProviderConfig`]
//! - Retry logic with exponential backoff
//! - Timeout handling
//!
//! # Examples
//!
//! ```no_run
//! use tariff_llm::{OpenAiCompatProvider, ProviderConfig};
//!
//! # fn example() -> Result<(), tariff_llm::LlmError> {
//! // Reads OPENAI_API_KEY from the environment
//! let provider = OpenAiCompatProvider::from_env(ProviderConfig::openai())?;
//!
//! // `chat` is async; the LlmProvider trait offers a blocking wrapper
//! # Ok(())
//! # }
//! ```

use crate::error::LlmError;
use crate::provider::{ProviderConfig, MAX_RETRIES};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tariff_domain::traits::LlmProvider as LlmProviderTrait;
use tracing::{debug, warn};

/// Chat Completions client for one configured provider
pub struct OpenAiCompatProvider {
    config: ProviderConfig,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl OpenAiCompatProvider {
    /// Create a provider with an explicit API key
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: ProviderConfig, api_key: impl Into<String>) -> Result<Self, LlmError> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| LlmError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            api_key: api_key.into(),
            client,
        })
    }

    /// Create a provider, reading the API key from `config.api_key_env`
    pub fn from_env(config: ProviderConfig) -> Result<Self, LlmError> {
        let api_key = config.api_key()?;
        Self::new(config, api_key)
    }

    /// Set the maximum number of attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.config.max_retries = max_retries.clamp(1, MAX_RETRIES);
        self
    }

    /// The provider configuration
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Run one chat completion
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The endpoint cannot be reached after all retries
    /// - The model is not available (HTTP 404)
    /// - The response has no choices or no content
    pub async fn chat(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        let url = self.config.completions_url();
        let request_body = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        // Retry logic with exponential backoff
        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.config.max_retries {
            match self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .header(reqwest::header::ACCEPT, "application/json")
                .json(&request_body)
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let parsed = response.json::<ChatResponse>().await.map_err(|e| {
                            LlmError::InvalidResponse(format!("Failed to parse response: {}", e))
                        })?;
                        return first_content(parsed);
                    } else if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(LlmError::ModelNotAvailable(self.config.model.clone()));
                    } else if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(LlmError::RateLimitExceeded);
                    } else {
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Unknown error".to_string());
                        last_error = Some(LlmError::Communication(format!(
                            "HTTP {}: {}",
                            status, error_text
                        )));
                    }
                }
                Err(e) => {
                    last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.config.max_retries {
                let delay = backoff_delay(attempts);
                warn!(
                    "{} request failed (attempt {}/{}), retrying in {:?}",
                    self.config.name, attempts, self.config.max_retries, delay
                );
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }
}

fn first_content(response: ChatResponse) -> Result<String, LlmError> {
    let content = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::InvalidResponse("Response has no choices".to_string()))?
        .message
        .content
        .ok_or_else(|| LlmError::InvalidResponse("LLM returned null content".to_string()))?;
    debug!("LLM response length: {} chars", content.len());
    Ok(content)
}

impl LlmProviderTrait for OpenAiCompatProvider {
    type Error = LlmError;

    fn generate(&self, system: &str, prompt: &str) -> Result<String, Self::Error> {
        // Blocking wrapper for the async call; run it off the async workers
        tokio::runtime::Runtime::new()
            .map_err(|e| LlmError::Other(format!("Failed to start runtime: {}", e)))?
            .block_on(self.chat(system, prompt))
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

/// Longest wait between two attempts
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Exponential backoff after the given failed attempt: 1s, 2s, 4s, ...
fn backoff_delay(attempt: u32) -> Duration {
    let secs = 2u64.saturating_pow(attempt.saturating_sub(1));
    Duration::from_secs(secs).min(MAX_BACKOFF)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_config() -> ProviderConfig {
        let mut config = ProviderConfig::openai();
        config.name = "local".to_string();
        config.base_url = "http://localhost:99999/v1".to_string();
        config
    }

    #[test]
    fn test_provider_creation() {
        let provider = OpenAiCompatProvider::new(ProviderConfig::openai(), "sk-test").unwrap();
        assert_eq!(provider.model_name(), crate::provider::DEFAULT_OPENAI_MODEL);
        assert_eq!(provider.config().max_retries, 3);
    }

    #[test]
    fn test_provider_rejects_invalid_config() {
        let mut config = ProviderConfig::openai();
        config.timeout_secs = 0;
        assert!(OpenAiCompatProvider::new(config, "sk-test").is_err());
    }

    #[test]
    fn test_with_max_retries() {
        let provider = OpenAiCompatProvider::new(ProviderConfig::deepinfra(), "key")
            .unwrap()
            .with_max_retries(5);
        assert_eq!(provider.config().max_retries, 5);

        let provider = OpenAiCompatProvider::new(ProviderConfig::deepinfra(), "key")
            .unwrap()
            .with_max_retries(500);
        assert_eq!(provider.config().max_retries, MAX_RETRIES);

        let provider = provider.with_max_retries(0);
        assert_eq!(provider.config().max_retries, 1);
    }

    #[test]
    fn test_backoff_delay_is_bounded() {
        assert_eq!(backoff_delay(1), Duration::from_secs(1));
        assert_eq!(backoff_delay(3), Duration::from_secs(4));
        assert_eq!(backoff_delay(66), MAX_BACKOFF);
        assert_eq!(backoff_delay(u32::MAX), MAX_BACKOFF);
    }

    #[test]
    fn test_first_content() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"role": "assistant", "content": "{\"duty_rate\": \"free\"}"}}]}"#,
        )
        .unwrap();
        assert_eq!(first_content(response).unwrap(), r#"{"duty_rate": "free"}"#);

        let empty: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(first_content(empty), Err(LlmError::InvalidResponse(_))));

        let null: ChatResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": null}}]}"#).unwrap();
        assert!(matches!(first_content(null), Err(LlmError::InvalidResponse(_))));
    }

    #[test]
    fn test_request_wire_format() {
        let request = ChatRequest {
            model: "m",
            messages: [
                ChatMessage {
                    role: "system",
                    content: "sys",
                },
                ChatMessage {
                    role: "user",
                    content: "hi",
                },
            ],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "m");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "hi");
    }

    #[tokio::test]
    async fn test_error_handling() {
        // Invalid port to trigger a request error
        let provider = OpenAiCompatProvider::new(local_config(), "key")
            .unwrap()
            .with_max_retries(1);

        let result = provider.chat("system", "test").await;
        match result {
            Err(LlmError::Communication(_)) => {} // Expected
            other => panic!("Expected Communication error, got {:?}", other.map(|_| ())),
        }
    }
}
