//! # mrs-cli
//!
//! Command-line interface for generating mapping requirement sheets.
//!
//! `mrs run` processes every report/mapper pair below a directory, `mrs
//! inspect` prints the reconciled rows of a single pair as JSON, and `mrs
//! detect` shows what a report file name encodes.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use mrs_pipeline::{
    FilePair, OutputFormat, PairLogLayer, Pipeline, PipelineConfig, build_table,
};
use mrs_translate::{ChatTranslator, OpenAiClient, TranslationConfig};
use tracing::{info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "mrs")]
#[command(about = "Mapping requirement sheet generator")]
#[command(version)]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a sheet for every report/mapper pair below a directory
    Run {
        /// Directory searched recursively for `*.txt` reports
        dir: PathBuf,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<Format>,

        /// Fail a pair on unrecognized report lines
        #[arg(long)]
        strict: bool,

        /// Skip extended rule translation
        #[arg(long)]
        no_translate: bool,
    },

    /// Print the reconciled rows of one pair as JSON
    Inspect {
        /// Mapping report (`*.txt`)
        report: PathBuf,

        /// Mapper XML
        mapper: PathBuf,

        /// Fail on unrecognized report lines
        #[arg(long)]
        strict: bool,
    },

    /// Show the direction and transaction type encoded in a file name
    Detect {
        file_name: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Xlsx,
    Csv,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Xlsx => OutputFormat::Xlsx,
            Format::Csv => OutputFormat::Csv,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_yaml_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    init_logging(
        cli.verbose,
        cli.log_file.as_deref(),
        config.pair_log_file.as_deref(),
    )?;

    match cli.command {
        Commands::Run {
            dir,
            format,
            strict,
            no_translate,
        } => {
            if let Some(format) = format {
                config.output_format = format.into();
            }
            config.strict |= strict;
            if no_translate {
                config.translation.enabled = false;
            }
            run(&dir, config).await
        }
        Commands::Inspect {
            report,
            mapper,
            strict,
        } => {
            config.strict |= strict;
            let table = build_table(&FilePair::new(&report, &mapper), &config)
                .with_context(|| format!("Failed to reconcile {}", report.display()))?;
            println!("{}", serde_json::to_string_pretty(&table.reconciliation.rows)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Detect { file_name } => {
            let detected = mrs_ir::detect(&file_name)?;
            println!("direction: {}", detected.direction);
            println!(
                "transaction_type: {}",
                detected.transaction_type.as_deref().unwrap_or("-")
            );
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn run(dir: &Path, config: PipelineConfig) -> anyhow::Result<ExitCode> {
    let pipeline = if config.translation.enabled {
        let translator = translator(&config.translation)
            .context("Cannot set up rule translation (use --no-translate to skip it)")?;
        Pipeline::new(config).with_translator(translator)
    } else {
        info!("Rule translation disabled");
        Pipeline::new(config)
    };

    let summary = pipeline
        .run(dir)
        .await
        .with_context(|| format!("Failed to process {}", dir.display()))?;

    for result in &summary.results {
        match (&result.output, &result.error) {
            (Some(output), _) => println!(
                "OK    {} -> {} ({} rows)",
                result.report.display(),
                output.display(),
                result.rows
            ),
            (None, error) => println!(
                "FAIL  {}: {}",
                result.report.display(),
                error.as_deref().unwrap_or("unknown error")
            ),
        }
    }
    println!(
        "{} processed, {} successful, {} failed, {} rows",
        summary.processed, summary.successful, summary.failed, summary.rows
    );

    if summary.processed == 0 {
        warn!(dir = %dir.display(), "No mapping reports found");
    }
    Ok(if summary.failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn translator(config: &TranslationConfig) -> anyhow::Result<ChatTranslator<OpenAiClient>> {
    let client = OpenAiClient::from_config(config)?;
    let knowledge_base = config.load_knowledge_base()?;
    info!(
        model = %config.model,
        endpoint = client.endpoint(),
        knowledge_base = knowledge_base.len(),
        "Rule translation enabled"
    );
    Ok(ChatTranslator::new(client, knowledge_base).temperature(config.temperature))
}

/// Global subscriber: one formatted stream (stderr or `log_file`) plus a
/// log file next to each processed report.
fn init_logging(verbose: u8, log_file: Option<&Path>, pair_log: Option<&str>) -> anyhow::Result<()> {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let pair_layer = pair_log.map(PairLogLayer::new);
    let registry = tracing_subscriber::registry().with(filter).with(pair_layer);

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Cannot create log file {}", path.display()))?;
            registry
                .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
                .init();
        }
        None => {
            registry
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
    Ok(())
}
