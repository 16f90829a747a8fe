//! Field module - the fixed set of record slots

use serde::{Deserialize, Serialize};

/// A named field of a ruling record
///
/// The serialized form is the canonical snake_case key used in benchmark
/// files and JSON reports (`ruling_id`, `hts_decision`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Ruling control number (e.g. N340865)
    RulingId,
    /// Firm submitting the request, often a law firm or broker
    SubmittingFirm,
    /// Person submitting the request
    Submitter,
    /// Client on whose behalf the request was made
    Importer,
    /// Date of the requester's letter
    DateSubmitted,
    /// Date of the ruling letter itself
    DateReplied,
    /// Signature block of the replying official
    ReplyingPerson,
    /// Import specialist named as the contact
    CaseHandler,
    /// Tariff code proposed by the requester
    HtsSuggestion,
    /// Tariff code decided in the ruling
    HtsDecision,
    /// Applicable duty rate
    DutyRate,
    /// Narrative description of the merchandise
    ProductDescription,
}

impl Field {
    /// Every field, in the default schema order
    pub const ALL: [Field; 12] = [
        Field::RulingId,
        Field::SubmittingFirm,
        Field::Submitter,
        Field::Importer,
        Field::DateSubmitted,
        Field::DateReplied,
        Field::ReplyingPerson,
        Field::CaseHandler,
        Field::HtsSuggestion,
        Field::HtsDecision,
        Field::DutyRate,
        Field::ProductDescription,
    ];

    /// Canonical key of the field
    pub fn key(&self) -> &'static str {
        match self {
            Field::RulingId => "ruling_id",
            Field::SubmittingFirm => "submitting_firm",
            Field::Submitter => "submitter",
            Field::Importer => "importer",
            Field::DateSubmitted => "date_submitted",
            Field::DateReplied => "date_replied",
            Field::ReplyingPerson => "replying_person",
            Field::CaseHandler => "case_handler",
            Field::HtsSuggestion => "hts_suggestion",
            Field::HtsDecision => "hts_decision",
            Field::DutyRate => "duty_rate",
            Field::ProductDescription => "product_description",
        }
    }

    /// Parse a field from its canonical key
    pub fn parse(key: &str) -> Option<Self> {
        Field::ALL.into_iter().find(|f| f.key() == key.trim())
    }

    /// Whether comparisons must treat this field's formatting as significant
    ///
    /// The signature block keeps its line structure (`<br>` separators), so
    /// collapsing whitespace before comparing would hide real differences.
    pub fn is_whitespace_sensitive(&self) -> bool {
        matches!(self, Field::ReplyingPerson)
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Unknown field: {}", s))
    }
}
