//! Output formatting for the CLI.

use crate::error::Result;
use crate::pipeline::RunReport;
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};
use tariff_domain::{Field, Record};

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
    /// Quiet format (counts only)
    Quiet,
}

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the result of a pipeline run.
    pub fn format_run(&self, report: &RunReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::Table => Ok(self.format_run_table(report)),
            OutputFormat::Quiet => Ok(format!(
                "{} {}",
                report.summary.flagged_rulings, report.summary.flagged_fields
            )),
        }
    }

    fn format_run_table(&self, report: &RunReport) -> String {
        let mut lines = Vec::new();

        let summary = &report.summary;
        lines.push(self.success(&format!(
            "Extracted {} of {} rulings ({} LLM records{})",
            report.regex_records,
            report.requested,
            report.llm_records,
            if report.llm_ran { ", fresh" } else { ", saved" }
        )));
        if !report.missing_documents.is_empty() {
            lines.push(self.warning(&format!(
                "No document for: {}",
                report.missing_documents.join(", ")
            )));
        }
        if !report.llm_failures.is_empty() {
            lines.push(self.warning(&format!(
                "LLM failed for: {}",
                report.llm_failures.join(", ")
            )));
        }

        let mut builder = Builder::default();
        builder.push_record(["Field", "Flagged"]);
        for (field, count) in &summary.per_field {
            builder.push_record([field.key().to_string(), count.to_string()]);
        }
        lines.push(styled(builder));

        lines.push(self.info(&format!(
            "{} of {} rulings need review ({:.0}%), {} fields in total",
            summary.flagged_rulings,
            summary.rulings,
            summary.flagged_ratio() * 100.0,
            summary.flagged_fields
        )));
        lines.join("\n")
    }

    /// Format one extracted record.
    pub fn format_record(&self, record: &Record) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
            OutputFormat::Quiet => Ok(record.populated_count().to_string()),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Field", "Value"]);
                for field in Field::ALL {
                    let value = record.get(field).unwrap_or("-");
                    builder.push_record([field.key(), value]);
                }
                Ok(styled(builder))
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn styled(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}
