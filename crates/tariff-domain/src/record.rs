//! Record module - one extraction result per ruling

use crate::field::Field;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Marker joining the lines of a multi-line value (the replying person's
/// name, title and office)
pub const LINE_BREAK: &str = "<br>";

/// Structured fields extracted from a single ruling letter
///
/// Every field except the identifier is optional: not every ruling carries
/// every signal, and an absent value is never guessed. Serialized with the
/// canonical keys from [`Field::key`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Ruling control number
    #[serde(rename = "ruling_id")]
    pub id: String,
    /// Firm submitting the request
    #[serde(default)]
    pub submitting_firm: Option<String>,
    /// Person submitting the request
    #[serde(default)]
    pub submitter: Option<String>,
    /// Client the request was made for
    #[serde(default)]
    pub importer: Option<String>,
    /// Date of the requester's letter
    #[serde(default)]
    pub date_submitted: Option<String>,
    /// Date of the ruling letter
    #[serde(default)]
    pub date_replied: Option<String>,
    /// Signature block of the replying official
    #[serde(default)]
    pub replying_person: Option<String>,
    /// Import specialist named as the contact
    #[serde(default)]
    pub case_handler: Option<String>,
    /// Requester's proposed tariff code
    #[serde(default)]
    pub hts_suggestion: Option<String>,
    /// Decided tariff code
    #[serde(default)]
    pub hts_decision: Option<String>,
    /// Duty rate
    #[serde(default)]
    pub duty_rate: Option<String>,
    /// Narrative product description
    #[serde(default)]
    pub product_description: Option<String>,
}

impl Record {
    /// Create an empty record for a ruling identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Get a field value
    ///
    /// The identifier is reported as absent when it is empty.
    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::RulingId => Some(self.id.as_str()).filter(|id| !id.is_empty()),
            _ => self.slot(field).and_then(|v| v.as_deref()),
        }
    }

    /// Set a field value
    ///
    /// Setting the identifier to `None` clears it to the empty string.
    pub fn set(&mut self, field: Field, value: Option<String>) {
        match field {
            Field::RulingId => self.id = value.unwrap_or_default(),
            _ => {
                if let Some(slot) = self.slot_mut(field) {
                    *slot = value;
                }
            }
        }
    }

    /// Number of populated fields, not counting the identifier
    pub fn populated_count(&self) -> usize {
        Field::ALL
            .into_iter()
            .filter(|f| *f != Field::RulingId)
            .filter(|f| self.get(*f).is_some())
            .count()
    }

    /// Build a record from a loosely-typed JSON object
    ///
    /// Unknown keys are ignored, `null` and missing keys become `None`, and
    /// non-string scalars (numbers, booleans) are stringified. LLM replies
    /// and hand-edited benchmark files both go through here.
    pub fn from_json_object(obj: &Map<String, Value>) -> Self {
        let mut record = Record::default();
        for (key, value) in obj {
            let Some(field) = Field::parse(key) else {
                continue;
            };
            record.set(field, json_scalar(value));
        }
        record
    }

    fn slot(&self, field: Field) -> Option<&Option<String>> {
        match field {
            Field::RulingId => None,
            Field::SubmittingFirm => Some(&self.submitting_firm),
            Field::Submitter => Some(&self.submitter),
            Field::Importer => Some(&self.importer),
            Field::DateSubmitted => Some(&self.date_submitted),
            Field::DateReplied => Some(&self.date_replied),
            Field::ReplyingPerson => Some(&self.replying_person),
            Field::CaseHandler => Some(&self.case_handler),
            Field::HtsSuggestion => Some(&self.hts_suggestion),
            Field::HtsDecision => Some(&self.hts_decision),
            Field::DutyRate => Some(&self.duty_rate),
            Field::ProductDescription => Some(&self.product_description),
        }
    }

    fn slot_mut(&mut self, field: Field) -> Option<&mut Option<String>> {
        match field {
            Field::RulingId => None,
            Field::SubmittingFirm => Some(&mut self.submitting_firm),
            Field::Submitter => Some(&mut self.submitter),
            Field::Importer => Some(&mut self.importer),
            Field::DateSubmitted => Some(&mut self.date_submitted),
            Field::DateReplied => Some(&mut self.date_replied),
            Field::ReplyingPerson => Some(&mut self.replying_person),
            Field::CaseHandler => Some(&mut self.case_handler),
            Field::HtsSuggestion => Some(&mut self.hts_suggestion),
            Field::HtsDecision => Some(&mut self.hts_decision),
            Field::DutyRate => Some(&mut self.duty_rate),
            Field::ProductDescription => Some(&mut self.product_description),
        }
    }
}

fn json_scalar(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
