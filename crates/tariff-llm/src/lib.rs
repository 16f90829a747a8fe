//! Tariff Rulings LLM Layer
//!
//! LLM-backed extraction of ruling records, as a second opinion next to the
//! regex heuristics.
//!
//! # Architecture
//!
//! This crate implements the `LlmProvider` and `FieldExtractor` traits from
//! `tariff-domain`:
//!
//! - [`OpenAiCompatProvider`]: any OpenAI-compatible chat completions API,
//!   configured through a [`ProviderConfig`] looked up in a [`ProviderRegistry`]
//! - [`MockProvider`]: deterministic mock for testing
//! - [`LlmExtractor`]: builds the extraction prompt, calls a provider and
//!   parses the JSON reply into a `Record`
//!
//! # Examples
//!
//! ```
//! use tariff_llm::{LlmExtractor, MockProvider};
//! use tariff_domain::traits::FieldExtractor;
//! use tariff_domain::DocumentText;
//!
//! let provider = MockProvider::new(r#"{"duty_rate": "free"}"#);
//! let extractor = LlmExtractor::new(provider);
//!
//! let doc = DocumentText::new("N340865", "text", "text");
//! let record = extractor.extract_record(&doc).unwrap();
//! assert_eq!(record.id, "N340865");
//! assert_eq!(record.duty_rate.as_deref(), Some("free"));
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod extractor;
pub mod openai;
pub mod parser;
pub mod prompt;
pub mod provider;

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tariff_domain::traits::LlmProvider as LlmProviderTrait;

pub use error::LlmError;
pub use extractor::LlmExtractor;
pub use openai::OpenAiCompatProvider;
pub use parser::parse_llm_response;
pub use prompt::{PromptBuilder, SYSTEM_PROMPT};
pub use provider::{ProviderConfig, ProviderRegistry};

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls.
/// Specific responses are keyed by a substring of the prompt (a ruling id
/// works well, since the extraction prompt carries `RULING ID: <id>`); the
/// first registered key found in the prompt wins.
///
/// # Examples
///
/// ```
/// use tariff_llm::MockProvider;
/// use tariff_domain::traits::LlmProvider;
///
/// // Simple fixed response
/// let provider = MockProvider::new("Fixed response");
/// assert_eq!(provider.generate("system", "any prompt").unwrap(), "Fixed response");
///
/// // Keyed responses
/// let mut provider = MockProvider::default();
/// provider.add_response("N1", "response1");
/// provider.add_response("N2", "response2");
/// assert_eq!(provider.generate("", "RULING ID: N1").unwrap(), "response1");
/// assert_eq!(provider.generate("", "RULING ID: N2").unwrap(), "response2");
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<Vec<(String, MockReply)>>>,
    call_count: Arc<Mutex<usize>>,
    delay: Option<Duration>,
}

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
            delay: None,
        }
    }

    /// Sleep this long before every reply
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Add a specific response for prompts containing `key`
    pub fn add_response(&mut self, key: impl Into<String>, response: impl Into<String>) {
        lock(&self.responses).push((key.into(), MockReply::Text(response.into())));
    }

    /// Configure to return an error for prompts containing `key`
    pub fn add_error(&mut self, key: impl Into<String>) {
        lock(&self.responses).push((key.into(), MockReply::Error));
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        *lock(&self.call_count)
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        *lock(&self.call_count) = 0;
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("{}")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    fn generate(&self, _system: &str, prompt: &str) -> Result<String, Self::Error> {
        *lock(&self.call_count) += 1;

        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }

        let responses = lock(&self.responses);
        match responses.iter().find(|(key, _)| prompt.contains(key.as_str())) {
            Some((_, MockReply::Text(response))) => Ok(response.clone()),
            Some((_, MockReply::Error)) => Err(LlmError::Other("Mock error".to_string())),
            None => Ok(self.default_response.clone()),
        }
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
