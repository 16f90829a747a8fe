//! Trait definitions for external collaborators
//!
//! These traits define the boundaries between the extraction core and the
//! I/O around it. Implementations live in other crates.

use crate::document::DocumentText;
use crate::record::Record;

/// Trait for retrieving the text of a ruling document
///
/// Implemented by the infrastructure layer (the CLI's file cache). A failed
/// fetch means "no document for this identifier"; callers log it and move
/// on to the next identifier.
pub trait DocumentSource {
    /// Error type for retrieval
    type Error;

    /// Fetch both text views for a ruling identifier
    fn fetch(&self, id: &str) -> Result<DocumentText, Self::Error>;
}

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (tariff-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate a completion from a system instruction and a user prompt
    fn generate(&self, system: &str, prompt: &str) -> Result<String, Self::Error>;

    /// Model name, for logging and report metadata
    fn model_name(&self) -> &str;
}

/// Trait for anything that turns one ruling document into a [`Record`]
///
/// Both the regex heuristics and the LLM-backed extractor implement this, so
/// callers can run either over a batch of identifiers the same way.
pub trait FieldExtractor {
    /// Error type for extraction
    type Error;

    /// Short label for the method ("regex", "llm"), used in report keys
    fn label(&self) -> &str;

    /// Extract a record for one document
    fn extract_record(&self, document: &DocumentText) -> Result<Record, Self::Error>;
}
