//! Field-by-field comparison of record sets
//!
//! All three reports take goal records (see [`crate::schema`]) and match them
//! across sets by `ruling_id`. Identifiers missing on one side are skipped,
//! never reported as errors. When a set lists an identifier twice, the last
//! record wins.

use crate::schema::{goal_id, GoalRecord};
use indexmap::IndexMap;
use std::collections::HashMap;
use tariff_domain::{BenchmarkSpec, Field};
use tariff_extractor::text::collapse_whitespace;
use tracing::debug;

/// Label of benchmark values in reports
pub const BENCH_LABEL: &str = "bench";

/// Label of regex values in reports
pub const REGEX_LABEL: &str = "regex";

/// Label of LLM values in reports
pub const LLM_LABEL: &str = "llm";

/// Competing values of one field, keyed by source label
pub type SourceValues = IndexMap<String, Option<String>>;

/// Differing fields of one ruling
pub type FieldDiffs = IndexMap<Field, SourceValues>;

/// ruling id -> field -> `{label: value, "bench": value}`
pub type BenchReport = IndexMap<String, FieldDiffs>;

/// ruling id -> fields where regex and LLM disagree
pub type DisagreementReport = IndexMap<String, Vec<Field>>;

/// ruling id -> field -> `{"bench", "regex", "llm"}` for fields needing review
pub type TriageReport = IndexMap<String, FieldDiffs>;

/// How whitespace is treated when deciding whether two values are equal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Equality {
    /// Collapse every field except whitespace-sensitive ones
    RespectSensitive,
    /// Collapse every field
    CollapseAll,
}

fn comparable(field: Field, value: Option<&str>, equality: Equality) -> Option<String> {
    value.map(|v| {
        if equality == Equality::RespectSensitive && field.is_whitespace_sensitive() {
            v.to_string()
        } else {
            collapse_whitespace(v)
        }
    })
}

fn differs(field: Field, a: Option<&str>, b: Option<&str>, equality: Equality) -> bool {
    comparable(field, a, equality) != comparable(field, b, equality)
}

fn value(goal: &GoalRecord, field: Field) -> Option<&str> {
    goal.get(&field).and_then(|v| v.as_deref())
}

fn index_by_id(records: &[GoalRecord]) -> HashMap<&str, &GoalRecord> {
    records
        .iter()
        .filter_map(|goal| goal_id(goal).map(|id| (id, goal)))
        .collect()
}

fn source_values(pairs: &[(&str, Option<&str>)]) -> SourceValues {
    pairs
        .iter()
        .map(|(label, v)| (label.to_string(), v.map(str::to_string)))
        .collect()
}

/// Compare predicted records against the benchmark
///
/// Only identifiers present in both sets are considered. A field is reported
/// when its collapsed values differ (`replying_person` is compared exactly);
/// the report keeps the values as given.
pub fn compare_to_benchmark(
    predicted: &[GoalRecord],
    bench: &[GoalRecord],
    spec: &BenchmarkSpec,
    label: &str,
) -> BenchReport {
    let bench_by_id = index_by_id(bench);
    let mut report = BenchReport::new();

    for pred in predicted {
        let Some(id) = goal_id(pred) else { continue };
        let Some(bench_rec) = bench_by_id.get(id) else {
            continue;
        };

        let mut diffs = FieldDiffs::new();
        for &field in spec.field_order() {
            let pv = value(pred, field);
            let bv = value(bench_rec, field);
            if differs(field, pv, bv, Equality::RespectSensitive) {
                diffs.insert(field, source_values(&[(label, pv), (BENCH_LABEL, bv)]));
            }
        }

        if !diffs.is_empty() {
            report.insert(id.to_string(), diffs);
        }
    }

    debug!(
        "Bench comparison ({}): {} of {} rulings differ",
        label,
        report.len(),
        predicted.len()
    );
    report
}

/// List the fields where regex and LLM records disagree
///
/// Every field is whitespace-collapsed before comparing, `replying_person`
/// included.
pub fn disagreement(
    regex: &[GoalRecord],
    llm: &[GoalRecord],
    spec: &BenchmarkSpec,
) -> DisagreementReport {
    let llm_by_id = index_by_id(llm);
    let mut report = DisagreementReport::new();

    for regex_rec in regex {
        let Some(id) = goal_id(regex_rec) else { continue };
        let Some(llm_rec) = llm_by_id.get(id) else {
            continue;
        };

        let fields: Vec<Field> = spec
            .field_order()
            .iter()
            .copied()
            .filter(|&field| {
                differs(
                    field,
                    value(regex_rec, field),
                    value(llm_rec, field),
                    Equality::CollapseAll,
                )
            })
            .collect();

        if !fields.is_empty() {
            report.insert(id.to_string(), fields);
        }
    }

    report
}

/// Flag fields that need manual review
///
/// For each regex record, a field is flagged when:
/// - there is no LLM record for the ruling at all, or
/// - regex and LLM values differ, or
/// - `include_vs_bench` is set, a benchmark record exists, and either method
///   differs from it.
///
/// Flagged fields carry the original (uncollapsed) values of all three
/// sources; rulings with nothing flagged are omitted.
pub fn triage(
    regex: &[GoalRecord],
    llm: &[GoalRecord],
    bench: &[GoalRecord],
    spec: &BenchmarkSpec,
    include_vs_bench: bool,
) -> TriageReport {
    let llm_by_id = index_by_id(llm);
    let bench_by_id = index_by_id(bench);
    let mut report = TriageReport::new();

    for regex_rec in regex {
        let Some(id) = goal_id(regex_rec) else { continue };
        let llm_rec = llm_by_id.get(id).copied();
        let bench_rec = bench_by_id.get(id).copied();

        let mut diffs = FieldDiffs::new();
        for &field in spec.field_order() {
            let rv = value(regex_rec, field);
            let lv = llm_rec.and_then(|r| value(r, field));
            let bv = bench_rec.and_then(|r| value(r, field));

            let eq = Equality::RespectSensitive;
            let regex_vs_llm = llm_rec.is_some() && differs(field, rv, lv, eq);
            let vs_bench = bench_rec.is_some()
                && (differs(field, rv, bv, eq) || differs(field, lv, bv, eq));

            if llm_rec.is_none() || regex_vs_llm || (include_vs_bench && vs_bench) {
                diffs.insert(
                    field,
                    source_values(&[(BENCH_LABEL, bv), (REGEX_LABEL, rv), (LLM_LABEL, lv)]),
                );
            }
        }

        if !diffs.is_empty() {
            report.insert(id.to_string(), diffs);
        }
    }

    debug!(
        "Triage: {} of {} rulings need review",
        report.len(),
        regex.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{export_to_goal_schema, project_raw};
    use tariff_domain::Record;

    fn spec() -> BenchmarkSpec {
        BenchmarkSpec::new(vec![
            Field::RulingId,
            Field::ReplyingPerson,
            Field::HtsDecision,
            Field::DutyRate,
        ])
    }

    fn goal(id: &str, hts: Option<&str>, duty: Option<&str>, person: Option<&str>) -> GoalRecord {
        let mut record = Record::new(id);
        record.hts_decision = hts.map(str::to_string);
        record.duty_rate = duty.map(str::to_string);
        record.replying_person = person.map(str::to_string);
        project_raw(&record, &spec())
    }

    #[test]
    fn test_compare_reports_only_differences() {
        let predicted = vec![goal("N1", Some("1902.19.2090"), Some("free"), None)];
        let bench = vec![goal("N1", Some("1902.19.2090"), Some("6.4 percent ad valorem"), None)];

        let report = compare_to_benchmark(&predicted, &bench, &spec(), "regex");
        assert_eq!(report.len(), 1);
        let diffs = &report["N1"];
        assert_eq!(diffs.keys().copied().collect::<Vec<_>>(), vec![Field::DutyRate]);
        assert_eq!(diffs[&Field::DutyRate]["regex"].as_deref(), Some("free"));
        assert_eq!(
            diffs[&Field::DutyRate]["bench"].as_deref(),
            Some("6.4 percent ad valorem")
        );
    }

    #[test]
    fn test_compare_skips_ids_missing_from_bench() {
        let predicted = vec![
            goal("N1", Some("1111.11.1111"), None, None),
            goal("N2", Some("2222.22.2222"), None, None),
        ];
        let bench = vec![goal("N2", Some("9999.99.9999"), None, None)];

        let report = compare_to_benchmark(&predicted, &bench, &spec(), "llm");
        assert!(!report.contains_key("N1"));
        assert!(report.contains_key("N2"));
    }

    #[test]
    fn test_compare_ignores_whitespace_except_replying_person() {
        let predicted = vec![goal("N1", None, Some(" 6.4  percent\nad valorem"), Some("A<br> B"))];
        let bench = vec![goal("N1", None, Some("6.4 percent ad valorem"), Some("A<br>B"))];

        let report = compare_to_benchmark(&predicted, &bench, &spec(), "regex");
        let diffs = &report["N1"];
        assert!(!diffs.contains_key(&Field::DutyRate));
        assert!(diffs.contains_key(&Field::ReplyingPerson));
    }

    #[test]
    fn test_compare_none_differs_from_empty() {
        let predicted = vec![goal("N1", None, None, None)];
        let bench = vec![goal("N1", None, Some(""), None)];
        let report = compare_to_benchmark(&predicted, &bench, &spec(), "regex");
        assert!(report["N1"].contains_key(&Field::DutyRate));
    }

    #[test]
    fn test_disagreement_collapses_replying_person_too() {
        let regex = vec![goal("N1", Some("1111.11.1111"), None, Some("A<br> B"))];
        let llm = vec![
            goal("N1", Some("2222.22.2222"), None, Some("A<br>  B")),
            goal("N9", None, None, None),
        ];

        let report = disagreement(&regex, &llm, &spec());
        assert_eq!(report.len(), 1);
        assert_eq!(report["N1"], vec![Field::HtsDecision]);
    }

    #[test]
    fn test_disagreement_skips_missing_llm() {
        let regex = vec![goal("N1", Some("1111.11.1111"), None, None)];
        assert!(disagreement(&regex, &[], &spec()).is_empty());
    }

    #[test]
    fn test_triage_includes_ruling_without_llm_record() {
        let regex = vec![goal("N1", Some("1902.19.2090"), Some("free"), None)];
        let bench = vec![goal("N1", Some("1902.19.2090"), Some("free"), None)];

        let report = triage(&regex, &[], &bench, &spec(), true);
        let diffs = &report["N1"];
        assert_eq!(diffs.len(), spec().field_order().len());
        assert_eq!(diffs[&Field::DutyRate]["llm"], None);
        assert_eq!(diffs[&Field::DutyRate]["regex"].as_deref(), Some("free"));
    }

    #[test]
    fn test_triage_omits_agreeing_rulings() {
        let regex = vec![goal("N1", Some("1902.19.2090"), Some("free"), None)];
        let llm = vec![goal("N1", Some("1902.19.2090"), Some(" free "), None)];
        let bench = vec![goal("N1", Some("1902.19.2090"), Some("free"), None)];

        assert!(triage(&regex, &llm, &bench, &spec(), true).is_empty());
    }

    #[test]
    fn test_triage_bench_rule_is_optional() {
        let regex = vec![goal("N1", Some("1902.19.2090"), None, None)];
        let llm = vec![goal("N1", Some("1902.19.2090"), None, None)];
        let bench = vec![goal("N1", Some("6301.90.0010"), None, None)];

        let with_bench = triage(&regex, &llm, &bench, &spec(), true);
        assert_eq!(
            with_bench["N1"].keys().copied().collect::<Vec<_>>(),
            vec![Field::HtsDecision]
        );
        assert!(triage(&regex, &llm, &bench, &spec(), false).is_empty());
    }

    #[test]
    fn test_triage_keeps_original_values_and_label_order() {
        let regex = vec![goal("N1", None, Some("6.4  percent"), None)];
        let llm = vec![goal("N1", None, Some("free"), None)];

        let report = triage(&regex, &llm, &[], &spec(), true);
        let values = &report["N1"][&Field::DutyRate];
        let labels: Vec<&str> = values.keys().map(String::as_str).collect();
        assert_eq!(labels, vec!["bench", "regex", "llm"]);
        assert_eq!(values["regex"].as_deref(), Some("6.4  percent"));
        assert_eq!(values["bench"], None);
    }

    #[test]
    fn test_triage_follows_regex_order() {
        let regex = vec![
            goal("N2", Some("1"), None, None),
            goal("N1", Some("1"), None, None),
        ];
        let report = triage(&regex, &[], &[], &spec(), false);
        let ids: Vec<&str> = report.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["N2", "N1"]);
    }

    #[test]
    fn test_reports_serialize_with_canonical_keys() {
        let mut record = Record::new("N1");
        record.duty_rate = Some("free".to_string());
        let regex = vec![export_to_goal_schema(&record, &spec())];

        let report = triage(&regex, &[], &[], &spec(), true);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["N1"]["duty_rate"]["regex"], "free");
        assert!(json["N1"]["duty_rate"]["llm"].is_null());
    }
}
