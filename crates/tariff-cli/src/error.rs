//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Extractor setup error
    #[error("Extractor error: {0}")]
    Extractor(#[from] tariff_extractor::ExtractorError),

    /// Benchmark or record file error
    #[error("Report error: {0}")]
    Report(#[from] tariff_report::ReportError),

    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(#[from] tariff_llm::LlmError),

    /// No cached or raw text for a ruling
    #[error("No document for ruling '{0}'")]
    DocumentNotFound(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
