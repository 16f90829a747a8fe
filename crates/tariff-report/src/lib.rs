//! Tariff Rulings Reports
//!
//! Turns extracted records into comparable goal records and cross-checks
//! them.
//!
//! # Overview
//!
//! - [`export_to_goal_schema`]: project a [`Record`](tariff_domain::Record)
//!   onto the benchmark field order, collapsing whitespace and normalizing the
//!   signature block
//! - [`compare_to_benchmark`]: fields where one method differs from the
//!   benchmark
//! - [`disagreement`]: fields where regex and LLM disagree
//! - [`triage`]: fields that need manual review, with all three values
//! - [`TriageSummary`]: counts for the end-of-run summary
//!
//! # Example Usage
//!
//! ```
//! use tariff_domain::{BenchmarkSpec, Record};
//! use tariff_report::{export_to_goal_schema, triage};
//!
//! let spec = BenchmarkSpec::default();
//! let mut record = Record::new("N340865");
//! record.duty_rate = Some("free".to_string());
//!
//! let regex = vec![export_to_goal_schema(&record, &spec)];
//!
//! // No LLM record: every field of the ruling is flagged
//! let report = triage(&regex, &[], &[], &spec, true);
//! assert_eq!(report["N340865"].len(), spec.field_order().len());
//! ```

#![warn(missing_docs)]

pub mod compare;
mod error;
pub mod schema;
mod summary;

pub use compare::{
    compare_to_benchmark, disagreement, triage, BenchReport, DisagreementReport, SourceValues,
    TriageReport, BENCH_LABEL, LLM_LABEL, REGEX_LABEL,
};
pub use error::ReportError;
pub use schema::{
    export_to_goal_schema, normalize_replying_person, parse_records, parse_spec, project_raw,
    GoalRecord,
};
pub use summary::TriageSummary;
