//! LLM-backed field extraction

use crate::error::LlmError;
use crate::parser::parse_llm_response;
use crate::prompt::{PromptBuilder, SYSTEM_PROMPT};
use std::sync::Arc;
use std::time::Duration;
use tariff_domain::traits::{FieldExtractor, LlmProvider};
use tariff_domain::{DocumentText, Record};
use tokio::time::timeout;
use tracing::{debug, info};

/// Default upper bound for one extraction call
pub const DEFAULT_EXTRACTION_TIMEOUT: Duration = Duration::from_secs(120);

/// Extracts a ruling record by asking an LLM to fill the schema
///
/// The model reads the normalized view of the letter, the same body text the
/// tariff-code and description heuristics search.
pub struct LlmExtractor<L>
where
    L: LlmProvider<Error = LlmError>,
{
    provider: Arc<L>,
    timeout: Duration,
}

impl<L> LlmExtractor<L>
where
    L: LlmProvider<Error = LlmError>,
{
    /// Create a new extractor
    pub fn new(provider: L) -> Self {
        Self {
            provider: Arc::new(provider),
            timeout: DEFAULT_EXTRACTION_TIMEOUT,
        }
    }

    /// Set the per-document timeout used by [`LlmExtractor::extract`]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Model name of the underlying provider
    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    fn prompt_for(document: &DocumentText) -> String {
        PromptBuilder::new(&document.normalized)
            .with_ruling_id(&document.id)
            .build()
    }
}

impl<L> LlmExtractor<L>
where
    L: LlmProvider<Error = LlmError> + Send + Sync + 'static,
{
    /// Extract one record without blocking the async runtime
    ///
    /// The provider call runs on the blocking pool, bounded by the configured
    /// timeout.
    pub async fn extract(&self, document: &DocumentText) -> Result<Record, LlmError> {
        let prompt = Self::prompt_for(document);
        debug!("Prompt length for {}: {} chars", document.id, prompt.len());

        let provider = Arc::clone(&self.provider);
        let response = timeout(
            self.timeout,
            tokio::task::spawn_blocking(move || provider.generate(SYSTEM_PROMPT, &prompt)),
        )
        .await
        .map_err(|_| LlmError::Timeout)?
        .map_err(|e| LlmError::Other(format!("Task join error: {}", e)))??;

        let record = parse_llm_response(&response, &document.id)?;
        info!(
            "LLM extraction for {} ({}): {} fields populated",
            document.id,
            self.provider.model_name(),
            record.populated_count()
        );
        Ok(record)
    }
}

impl<L> FieldExtractor for LlmExtractor<L>
where
    L: LlmProvider<Error = LlmError>,
{
    type Error = LlmError;

    fn label(&self) -> &str {
        "llm"
    }

    fn extract_record(&self, document: &DocumentText) -> Result<Record, Self::Error> {
        let response = self
            .provider
            .generate(SYSTEM_PROMPT, &Self::prompt_for(document))?;
        parse_llm_response(&response, &document.id)
    }
}
