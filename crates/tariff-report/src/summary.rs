//! Counts over a triage report

use crate::compare::TriageReport;
use indexmap::IndexMap;
use serde::Serialize;
use tariff_domain::{BenchmarkSpec, Field};

/// How much of a run needs manual review
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TriageSummary {
    /// Rulings processed
    pub rulings: usize,
    /// Rulings with at least one flagged field
    pub flagged_rulings: usize,
    /// Flagged fields across all rulings
    pub flagged_fields: usize,
    /// Flagged count per field, in benchmark order (fields never flagged
    /// are listed with 0)
    pub per_field: IndexMap<Field, usize>,
}

impl TriageSummary {
    /// Summarize a triage report over `rulings` processed identifiers
    pub fn from_report(report: &TriageReport, spec: &BenchmarkSpec, rulings: usize) -> Self {
        let mut per_field: IndexMap<Field, usize> =
            spec.field_order().iter().map(|f| (*f, 0)).collect();

        for diffs in report.values() {
            for field in diffs.keys() {
                *per_field.entry(*field).or_insert(0) += 1;
            }
        }

        Self {
            rulings,
            flagged_rulings: report.len(),
            flagged_fields: per_field.values().sum(),
            per_field,
        }
    }

    /// Share of processed rulings that were flagged, 0.0 when none ran
    pub fn flagged_ratio(&self) -> f64 {
        if self.rulings == 0 {
            0.0
        } else {
            self.flagged_rulings as f64 / self.rulings as f64
        }
    }
}
