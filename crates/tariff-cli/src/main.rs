//! Tariff CLI - extract, compare and triage customs ruling letters.

use clap::Parser;
use std::fs;
use tariff_cli::cli::{ExtractArgs, RunArgs};
use tariff_cli::{Cli, Command, Config, Formatter, Layout, Pipeline};
use tariff_extractor::text::document_from_raw;
use tariff_extractor::RegexExtractor;
use tariff_llm::{LlmExtractor, OpenAiCompatProvider};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Log to stderr; stdout carries the report
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level())),
        )
        .init();

    let formatter = Formatter::new(cli.format, !cli.no_color);
    if let Err(e) = run(cli).await {
        eprintln!("{}", formatter.error(&format!("Error: {}", e)));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> tariff_cli::Result<()> {
    match &cli.command {
        Command::Run(args) => execute_run(&cli, args).await,
        Command::Extract(args) => execute_extract(&cli, args),
    }
}

fn load_config(cli: &Cli, base_dir: &std::path::Path) -> tariff_cli::Result<Config> {
    match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(base_dir),
    }
}

async fn execute_run(cli: &Cli, args: &RunArgs) -> tariff_cli::Result<()> {
    let mut config = load_config(cli, &args.base_dir)?;
    if args.no_bench_triage {
        config.settings.include_vs_bench = false;
    }
    let formatter = Formatter::new(cli.format, !cli.no_color && config.settings.color);

    let layout = Layout::new(&args.base_dir);
    let ids = tariff_cli::inputs::load_ruling_ids(&layout, &config.settings.fallback_ruling_ids)?;
    let pipeline = Pipeline::from_layout(layout, &config)?;

    let report = if args.llm {
        let provider_config =
            config.resolve_provider(args.provider.as_deref(), args.model.as_deref())?;
        let provider = OpenAiCompatProvider::from_env(provider_config)?;
        let extractor = LlmExtractor::new(provider).with_timeout(config.llm_timeout());
        pipeline.run(&ids, Some(&extractor)).await?
    } else {
        pipeline.run::<OpenAiCompatProvider>(&ids, None).await?
    };

    println!("{}", formatter.format_run(&report)?);
    Ok(())
}

fn execute_extract(cli: &Cli, args: &ExtractArgs) -> tariff_cli::Result<()> {
    let base_dir = args
        .file
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_default();
    let config = load_config(cli, &base_dir)?;
    let formatter = Formatter::new(cli.format, !cli.no_color && config.settings.color);

    let id = match &args.id {
        Some(id) => id.clone(),
        None => args
            .file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };

    let raw = fs::read_to_string(&args.file)?;
    let extractor = RegexExtractor::new(config.extractor)?;
    let record = extractor.extract(&document_from_raw(&id, &raw));

    println!("{}", formatter.format_record(&record)?);
    Ok(())
}
