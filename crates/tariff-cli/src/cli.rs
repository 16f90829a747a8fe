//! CLI command definitions and argument parsing.

use crate::output::OutputFormat;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Tariff ruling extraction: regex heuristics, optional LLM, benchmark triage.
#[derive(Debug, Parser)]
#[command(name = "tariff")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true, default_value = "table")]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path (default: <base-dir>/tariff.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace); RUST_LOG wins when set
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract every ruling, compare with the benchmark, write the triage report
    Run(RunArgs),

    /// Run the regex extractor over one raw letter and print the record
    Extract(ExtractArgs),
}

/// Arguments for the run command.
#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Base directory holding in/, out/ and cache/
    #[arg(short, long, env = "TARIFF_BASE_DIR", default_value = ".")]
    pub base_dir: PathBuf,

    /// Also run LLM extraction
    #[arg(long)]
    pub llm: bool,

    /// LLM provider name (overrides the config file)
    #[arg(long, requires = "llm")]
    pub provider: Option<String>,

    /// LLM model (overrides the config file)
    #[arg(long, requires = "llm")]
    pub model: Option<String>,

    /// Only flag regex/LLM disagreements, not differences from the benchmark
    #[arg(long)]
    pub no_bench_triage: bool,
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// Raw letter text file
    pub file: PathBuf,

    /// Ruling id for the record (default: file stem)
    #[arg(long)]
    pub id: Option<String>,
}

impl Cli {
    /// Log filter directive implied by `-v`.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
