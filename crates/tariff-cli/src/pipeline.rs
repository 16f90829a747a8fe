//! End-to-end extraction and triage run.

use crate::config::Config;
use crate::error::Result;
use crate::inputs::{self, Layout};
use crate::source::FileDocumentSource;
use serde::Serialize;
use std::fmt::Display;
use std::fs;
use std::path::Path;
use tariff_domain::traits::{DocumentSource, LlmProvider};
use tariff_domain::BenchmarkSpec;
use tariff_extractor::RegexExtractor;
use tariff_llm::{LlmError, LlmExtractor};
use tariff_report::{
    compare_to_benchmark, disagreement, export_to_goal_schema, project_raw, triage, GoalRecord,
    TriageSummary, REGEX_LABEL,
};
use tracing::{info, warn};

/// What a run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Ruling ids requested
    pub requested: usize,
    /// Regex records written
    pub regex_records: usize,
    /// LLM records used for triage (fresh or re-read from disk)
    pub llm_records: usize,
    /// Whether the LLM ran in this run
    pub llm_ran: bool,
    /// Ids with no document
    pub missing_documents: Vec<String>,
    /// Ids whose LLM extraction failed
    pub llm_failures: Vec<String>,
    /// Triage counts
    pub summary: TriageSummary,
}

/// One configured run over a base directory.
pub struct Pipeline<S> {
    layout: Layout,
    spec: BenchmarkSpec,
    bench: Vec<GoalRecord>,
    source: S,
    regex: RegexExtractor,
    include_vs_bench: bool,
}

impl Pipeline<FileDocumentSource> {
    /// Set up a run from the base directory layout and configuration.
    ///
    /// Reads the benchmark spec (required) and values (optional), and uses
    /// the layout's cache directory as the document source.
    pub fn from_layout(layout: Layout, config: &Config) -> Result<Self> {
        let source = FileDocumentSource::new(layout.cache_dir());
        Self::with_source(layout, config, source)
    }
}

impl<S> Pipeline<S>
where
    S: DocumentSource,
    S::Error: Display,
{
    /// Set up a run with an explicit document source.
    pub fn with_source(layout: Layout, config: &Config, source: S) -> Result<Self> {
        let spec = inputs::load_spec(&layout)?;
        let bench: Vec<GoalRecord> = inputs::load_bench_values(&layout)?
            .iter()
            .map(|record| project_raw(record, &spec))
            .collect();
        info!(
            "Benchmark: {} fields, {} records",
            spec.field_order().len(),
            bench.len()
        );

        Ok(Self {
            layout,
            spec,
            bench,
            source,
            regex: RegexExtractor::new(config.extractor.clone())?,
            include_vs_bench: config.settings.include_vs_bench,
        })
    }

    /// The benchmark specification in use.
    pub fn spec(&self) -> &BenchmarkSpec {
        &self.spec
    }

    /// Extract every ruling, compare, and write all artifacts.
    ///
    /// With an LLM extractor, each ruling also goes through the model and the
    /// LLM records file is rewritten. Without one, previously saved LLM
    /// records are re-read and re-projected so triage still has them. A
    /// ruling whose document or LLM call fails is logged and skipped.
    pub async fn run<L>(&self, ids: &[String], llm: Option<&LlmExtractor<L>>) -> Result<RunReport>
    where
        L: LlmProvider<Error = LlmError> + Send + Sync + 'static,
    {
        self.layout.ensure_dirs()?;

        let mut llm_goal: Vec<GoalRecord> = match llm {
            Some(_) => Vec::new(),
            None => inputs::load_records_if_exists(&self.layout.llm_raw_path())?
                .iter()
                .map(|record| export_to_goal_schema(record, &self.spec))
                .collect(),
        };
        if llm.is_none() && !llm_goal.is_empty() {
            info!("Re-using {} saved LLM records", llm_goal.len());
        }

        let mut regex_goal = Vec::with_capacity(ids.len());
        let mut missing_documents = Vec::new();
        let mut llm_failures = Vec::new();

        for id in ids {
            let document = match self.source.fetch(id) {
                Ok(document) => document,
                Err(e) => {
                    warn!("Skipping {}: {}", id, e);
                    missing_documents.push(id.clone());
                    continue;
                }
            };

            let record = self.regex.extract(&document);
            regex_goal.push(export_to_goal_schema(&record, &self.spec));

            if let Some(extractor) = llm {
                match extractor.extract(&document).await {
                    Ok(record) => llm_goal.push(export_to_goal_schema(&record, &self.spec)),
                    Err(e) => {
                        warn!("LLM extraction failed for {}: {}", id, e);
                        llm_failures.push(id.clone());
                    }
                }
            }
        }

        write_json(&self.layout.regex_raw_path(), &regex_goal)?;
        if llm.is_some() && !llm_goal.is_empty() {
            write_json(&self.layout.llm_raw_path(), &llm_goal)?;
        }

        let triage_report = triage(
            &regex_goal,
            &llm_goal,
            &self.bench,
            &self.spec,
            self.include_vs_bench,
        );
        write_json(&self.layout.triage_path(), &triage_report)?;

        let bench_report = compare_to_benchmark(&regex_goal, &self.bench, &self.spec, REGEX_LABEL);
        write_json(&self.layout.bench_regex_path(), &bench_report)?;

        let disagreement_report = disagreement(&regex_goal, &llm_goal, &self.spec);
        write_json(&self.layout.disagreement_path(), &disagreement_report)?;

        let summary = TriageSummary::from_report(&triage_report, &self.spec, regex_goal.len());
        info!(
            "Run complete: {} rulings extracted, {} flagged for review",
            regex_goal.len(),
            summary.flagged_rulings
        );

        Ok(RunReport {
            requested: ids.len(),
            regex_records: regex_goal.len(),
            llm_records: llm_goal.len(),
            llm_ran: llm.is_some(),
            missing_documents,
            llm_failures,
            summary,
        })
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    info!("Wrote {}", path.display());
    Ok(())
}
