//! Report error types

use thiserror::Error;

/// Errors that can occur while loading record sets or benchmark files
///
/// Comparison itself never fails; identifiers missing on one side are
/// skipped.
#[derive(Error, Debug)]
pub enum ReportError {
    /// Malformed JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Benchmark specification is unusable
    #[error("Invalid benchmark spec: {0}")]
    Spec(String),

    /// Record file has an unexpected shape
    #[error("Invalid records: {0}")]
    InvalidRecords(String),
}
