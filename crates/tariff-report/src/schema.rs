//! Goal-schema projection
//!
//! A goal record is the canonical, comparable form of an extraction: exactly
//! the benchmark's field order, with formatting rules applied. Every report in
//! [`crate::compare`] works on goal records.

use crate::error::ReportError;
use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tariff_domain::{BenchmarkSpec, Field, Record, LINE_BREAK};
use tariff_extractor::text::collapse_whitespace;
use tracing::warn;

/// Record projected onto a benchmark field order
///
/// Serializes as a JSON object whose keys follow the field order.
pub type GoalRecord = IndexMap<Field, Option<String>>;

static RE_LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid line break regex"));

/// Project a record onto the benchmark field order and apply formatting rules
///
/// `replying_person` goes through [`normalize_replying_person`]; every other
/// value is whitespace-collapsed. Fields the record does not carry are
/// `None`. Idempotent.
pub fn export_to_goal_schema(record: &Record, spec: &BenchmarkSpec) -> GoalRecord {
    normalize_goal(&project_raw(record, spec))
}

/// Project a record onto the benchmark field order without reformatting
///
/// Benchmark values are compared in this form: they are ground truth and
/// are not rewritten.
pub fn project_raw(record: &Record, spec: &BenchmarkSpec) -> GoalRecord {
    spec.field_order()
        .iter()
        .map(|field| (*field, record.get(*field).map(str::to_string)))
        .collect()
}

/// Apply the goal formatting rules to an already-projected record
pub fn normalize_goal(goal: &GoalRecord) -> GoalRecord {
    goal.iter()
        .map(|(field, value)| {
            let value = value.as_deref().and_then(|v| match field {
                Field::ReplyingPerson => normalize_replying_person(v),
                _ => Some(collapse_whitespace(v)),
            });
            (*field, value)
        })
        .collect()
}

/// Canonical form of a signature block
///
/// - Contains a line-break marker (`<br>`, `<br/>`, `<br />`, any case):
///   split on it, collapse each non-empty segment, rejoin with `<br>`
/// - Otherwise two or more non-empty lines: collapse each, rejoin with `<br>`
/// - Otherwise a single collapsed string
///
/// Blank input, or input made only of markers, is `None`.
///
/// ```
/// use tariff_report::normalize_replying_person;
///
/// assert_eq!(
///     normalize_replying_person("Steven A. Mack\n  Director\n"),
///     Some("Steven A. Mack<br>Director".to_string())
/// );
/// assert_eq!(
///     normalize_replying_person("Steven A. Mack<br />Director"),
///     Some("Steven A. Mack<br>Director".to_string())
/// );
/// assert_eq!(normalize_replying_person("  "), None);
/// ```
pub fn normalize_replying_person(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let joined = if RE_LINE_BREAK.is_match(value) {
        join_segments(RE_LINE_BREAK.split(value))
    } else {
        let lines: Vec<&str> = value.lines().filter(|l| !l.trim().is_empty()).collect();
        if lines.len() >= 2 {
            join_segments(lines.into_iter())
        } else {
            collapse_whitespace(value)
        }
    };

    Some(joined).filter(|s| !s.is_empty())
}

fn join_segments<'a>(segments: impl Iterator<Item = &'a str>) -> String {
    segments
        .map(collapse_whitespace)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(LINE_BREAK)
}

/// Rebuild a record from a goal record
///
/// Fields outside the goal's order stay `None`.
pub fn record_from_goal(goal: &GoalRecord) -> Record {
    let mut record = Record::default();
    for (field, value) in goal {
        record.set(*field, value.clone());
    }
    record
}

/// Identifier of a goal record, if present and non-empty
pub fn goal_id(goal: &GoalRecord) -> Option<&str> {
    goal.get(&Field::RulingId)
        .and_then(|v| v.as_deref())
        .filter(|id| !id.is_empty())
}

/// Parse a record file: a JSON array of objects, or an object keyed by id
///
/// Non-object array entries are skipped with a warning. In the keyed form a
/// record without its own `ruling_id` takes the key.
pub fn parse_records(json: &str) -> Result<Vec<Record>, ReportError> {
    match serde_json::from_str::<Value>(json)? {
        Value::Array(items) => Ok(items
            .iter()
            .enumerate()
            .filter_map(|(idx, item)| match item.as_object() {
                Some(obj) => Some(Record::from_json_object(obj)),
                None => {
                    warn!("Skipping record {}: not a JSON object", idx);
                    None
                }
            })
            .collect()),
        Value::Object(map) => map
            .iter()
            .map(|(id, item)| {
                let obj = item.as_object().ok_or_else(|| {
                    ReportError::InvalidRecords(format!("entry '{}' is not an object", id))
                })?;
                let mut record = Record::from_json_object(obj);
                if record.id.is_empty() {
                    record.id = id.clone();
                }
                Ok(record)
            })
            .collect(),
        _ => Err(ReportError::InvalidRecords(
            "expected an array of records or an object keyed by ruling id".to_string(),
        )),
    }
}

/// Parse and validate a benchmark specification
pub fn parse_spec(json: &str) -> Result<BenchmarkSpec, ReportError> {
    let spec: BenchmarkSpec = serde_json::from_str(json)?;
    spec.validate().map_err(ReportError::Spec)?;
    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(fields: &[Field]) -> BenchmarkSpec {
        BenchmarkSpec::new(fields.to_vec())
    }

    #[test]
    fn test_export_follows_field_order() {
        let mut record = Record::new("N340865");
        record.duty_rate = Some("6.4 percent  ad valorem".to_string());
        record.importer = Some("Pasta Imports".to_string());

        let order = [Field::DutyRate, Field::RulingId, Field::CaseHandler];
        let goal = export_to_goal_schema(&record, &spec(&order));

        let keys: Vec<Field> = goal.keys().copied().collect();
        assert_eq!(keys, order);
        assert_eq!(goal[&Field::DutyRate].as_deref(), Some("6.4 percent ad valorem"));
        assert_eq!(goal[&Field::CaseHandler], None);
        assert!(!goal.contains_key(&Field::Importer));
    }

    #[test]
    fn test_export_collapses_other_fields_only() {
        let mut record = Record::new("N1");
        record.product_description = Some("The sample,\n  a red\tcup.".to_string());
        record.replying_person = Some("Steven A. Mack\nDirector".to_string());

        let goal = export_to_goal_schema(&record, &BenchmarkSpec::default());
        assert_eq!(
            goal[&Field::ProductDescription].as_deref(),
            Some("The sample, a red cup.")
        );
        assert_eq!(
            goal[&Field::ReplyingPerson].as_deref(),
            Some("Steven A. Mack<br>Director")
        );
    }

    #[test]
    fn test_project_raw_keeps_formatting() {
        let mut record = Record::new("N1");
        record.submitter = Some("  Ms.  Barry ".to_string());
        let goal = project_raw(&record, &BenchmarkSpec::default());
        assert_eq!(goal[&Field::Submitter].as_deref(), Some("  Ms.  Barry "));
    }

    #[test]
    fn test_replying_person_marker_variants() {
        let expected = Some("Steven A. Mack<br>Director<br>National Commodity Specialist Division".to_string());
        assert_eq!(
            normalize_replying_person(
                "Steven A. Mack<br/>Director <BR> National Commodity  Specialist Division"
            ),
            expected
        );
        assert_eq!(
            normalize_replying_person("Steven A. Mack<br><br>Director<br>National Commodity Specialist Division<br>"),
            expected
        );
    }

    #[test]
    fn test_replying_person_single_line() {
        assert_eq!(
            normalize_replying_person("  Steven   A. Mack  "),
            Some("Steven A. Mack".to_string())
        );
        assert_eq!(
            normalize_replying_person("Steven A. Mack\n\n   "),
            Some("Steven A. Mack".to_string())
        );
    }

    #[test]
    fn test_replying_person_only_markers() {
        assert_eq!(normalize_replying_person("<br><br />"), None);
    }

    #[test]
    fn test_record_from_goal() {
        let mut record = Record::new("N1");
        record.hts_decision = Some("1902.19.2090".to_string());
        let goal = export_to_goal_schema(&record, &BenchmarkSpec::default());
        assert_eq!(record_from_goal(&goal), record);
        assert_eq!(goal_id(&goal), Some("N1"));
    }

    #[test]
    fn test_parse_records_array() {
        let json = r#"[
            {"ruling_id": "N1", "duty_rate": "free", "extra": 5},
            "garbage",
            {"ruling_id": "N2", "hts_decision": null}
        ]"#;
        let records = parse_records(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].duty_rate.as_deref(), Some("free"));
        assert_eq!(records[1].id, "N2");
    }

    #[test]
    fn test_parse_records_keyed_object() {
        let json = r#"{"N1": {"duty_rate": "free"}, "N2": {"ruling_id": "N2"}}"#;
        let records = parse_records(json).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().any(|r| r.id == "N1"));

        assert!(matches!(
            parse_records(r#"{"N1": 3}"#),
            Err(ReportError::InvalidRecords(_))
        ));
        assert!(matches!(parse_records("42"), Err(ReportError::InvalidRecords(_))));
        assert!(matches!(parse_records("[{"), Err(ReportError::Json(_))));
    }

    #[test]
    fn test_parse_spec_validates() {
        let spec = parse_spec(r#"{"output": {"field_order": ["ruling_id", "duty_rate"]}}"#)
            .unwrap();
        assert_eq!(spec.field_order(), &[Field::RulingId, Field::DutyRate]);

        let result = parse_spec(r#"{"output": {"field_order": ["duty_rate"]}}"#);
        assert!(matches!(result, Err(ReportError::Spec(_))));

        let result = parse_spec(r#"{"output": {"field_order": ["ruling_id", "colour"]}}"#);
        assert!(matches!(result, Err(ReportError::Json(_))));
    }
}
