//! Error types for LLM operations

use thiserror::Error;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// The provider's API key variable is unset or empty
    #[error("Missing API key: set {0} before running LLM extraction")]
    MissingApiKey(String),

    /// No provider registered under this name
    #[error("Unknown provider: {name} (available: {available})")]
    UnknownProvider {
        /// Requested provider name
        name: String,
        /// Comma-separated registered names
        available: String,
    },

    /// Invalid provider configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The call did not finish in time
    #[error("LLM call timed out")]
    Timeout,

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}
