//! Configuration for the regex extractor

use crate::error::ExtractorError;
use serde::{Deserialize, Serialize};

/// Tunable window sizes and thresholds for the field heuristics
///
/// The defaults reflect the observed ruling-letter layout; they are exposed
/// so unusual corpora can widen a window without code changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Lines scanned for the reply date when the letter has no "Dear"
    #[serde(default = "default_header_line_limit")]
    pub header_line_limit: usize,

    /// Non-empty lines of the pretty view considered for parties/people
    #[serde(default = "default_party_line_limit")]
    pub party_line_limit: usize,

    /// Lines after the "TARIFF NO" line searched for the recipient block
    #[serde(default = "default_tariff_block_window")]
    pub tariff_block_window: usize,

    /// Product descriptions this short (in characters) or shorter are dropped
    #[serde(default = "default_min_description_len")]
    pub min_description_len: usize,
}

fn default_header_line_limit() -> usize {
    40
}

fn default_party_line_limit() -> usize {
    200
}

fn default_tariff_block_window() -> usize {
    24
}

fn default_min_description_len() -> usize {
    30
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            header_line_limit: default_header_line_limit(),
            party_line_limit: default_party_line_limit(),
            tariff_block_window: default_tariff_block_window(),
            min_description_len: default_min_description_len(),
        }
    }
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ExtractorError> {
        if self.header_line_limit == 0 {
            return Err(ExtractorError::Config(
                "header_line_limit must be greater than 0".to_string(),
            ));
        }
        if self.party_line_limit == 0 {
            return Err(ExtractorError::Config(
                "party_line_limit must be greater than 0".to_string(),
            ));
        }
        if self.tariff_block_window == 0 {
            return Err(ExtractorError::Config(
                "tariff_block_window must be greater than 0".to_string(),
            ));
        }
        if self.tariff_block_window >= self.party_line_limit {
            return Err(ExtractorError::Config(
                "tariff_block_window must be smaller than party_line_limit".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ExtractorError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ExtractorError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
