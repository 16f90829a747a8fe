//! Record assembly: run every field extractor over one document

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::fields::{
    extract_dates, extract_duty_rate, extract_hts_codes, extract_parties_people,
    extract_product_description,
};
use std::convert::Infallible;
use tariff_domain::traits::FieldExtractor;
use tariff_domain::{DocumentText, Record};
use tracing::debug;

/// The regex/heuristic extractor
///
/// Dates and parties read the pretty view, where line positions matter;
/// tariff codes, duty rate and description read the normalized view, where
/// phrases may span paragraphs.
#[derive(Debug, Clone, Default)]
pub struct RegexExtractor {
    config: ExtractorConfig,
}

impl RegexExtractor {
    /// Create an extractor with a validated configuration
    pub fn new(config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration in use
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract one complete record; fields nothing matched stay `None`
    pub fn extract(&self, document: &DocumentText) -> Record {
        let (date_submitted, date_replied) = extract_dates(&document.pretty, &self.config);
        let (hts_suggestion, hts_decision) = extract_hts_codes(&document.normalized);
        let parties = extract_parties_people(&document.pretty, &self.config);

        let record = Record {
            id: document.id.clone(),
            submitting_firm: parties.submitting_firm,
            submitter: parties.submitter,
            importer: parties.importer,
            date_submitted,
            date_replied,
            replying_person: parties.replying_person,
            case_handler: parties.case_handler,
            hts_suggestion,
            hts_decision,
            duty_rate: extract_duty_rate(&document.normalized),
            product_description: extract_product_description(&document.normalized, &self.config),
        };

        debug!(
            "Regex extraction for {}: {} fields populated",
            record.id,
            record.populated_count()
        );
        record
    }
}

impl FieldExtractor for RegexExtractor {
    type Error = Infallible;

    fn label(&self) -> &str {
        "regex"
    }

    fn extract_record(&self, document: &DocumentText) -> Result<Record, Self::Error> {
        Ok(self.extract(document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::document_from_raw;

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = ExtractorConfig {
            party_line_limit: 0,
            ..ExtractorConfig::default()
        };
        assert!(RegexExtractor::new(config).is_err());
    }

    #[test]
    fn test_empty_document_gives_empty_record() {
        let extractor = RegexExtractor::default();
        let record = extractor.extract(&document_from_raw("N000001", ""));
        assert_eq!(record, Record::new("N000001"));
        assert_eq!(record.populated_count(), 0);
    }

    #[test]
    fn test_trait_label_and_result() {
        let extractor = RegexExtractor::default();
        let doc = document_from_raw("N1", "The rate of duty will be free.");
        assert_eq!(extractor.label(), "regex");
        let record = extractor.extract_record(&doc).unwrap();
        assert_eq!(record.duty_rate.as_deref(), Some("free"));
    }
}
