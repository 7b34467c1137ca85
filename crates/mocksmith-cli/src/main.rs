mod config;
mod logging;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use mocksmith_core::{Error as CoreError, build_relation_graph_report, load_schema_document};
use mocksmith_generate::{
    GenerateOptions, GenerationEngine, GenerationError, write_dataset_json, write_report_json,
};
use thiserror::Error;

use config::{ConfigError, DEFAULT_CONFIG_FILE, LogFormat, Settings};
use logging::{LoggingError, init_logging};

#[derive(Debug, Error)]
enum CliError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("logging error: {0}")]
    Logging(#[from] LoggingError),
    #[error("schema error: {0}")]
    Core(#[from] CoreError),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "mocksmith", version, about = "Schema-driven mock data generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate one JSON file per entity.
    Generate(GenerateArgs),
    /// Print the relation dependency report as JSON.
    Order(OrderArgs),
    /// Print the JSON Schema of schema documents.
    JsonSchema,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// Settings file; missing files fall back to defaults.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Log output format.
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,
    /// Append JSON log lines to this file instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Schema document (YAML, or JSON by extension).
    #[arg(long)]
    schema: Option<PathBuf>,
    /// Output directory for entity files.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Seed for generated values and relation picks.
    #[arg(long)]
    seed: Option<u64>,
    /// Fail on relation cycles.
    #[arg(long, default_value_t = false)]
    strict: bool,
    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(Args, Debug)]
struct OrderArgs {
    /// Schema document (YAML, or JSON by extension).
    #[arg(long)]
    schema: Option<PathBuf>,
    #[command(flatten)]
    config: ConfigArgs,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Order(args) => run_order(args),
        Command::JsonSchema => run_json_schema(),
    }
}

fn setup(args: &ConfigArgs) -> Result<Settings, CliError> {
    let settings = config::load_or_default(&args.config)?;
    let format = args.log_format.unwrap_or(settings.logging.format);
    init_logging(format, &settings.logging.filter, args.log_file.as_deref())?;
    Ok(settings)
}

fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    let settings = setup(&args.config)?;
    let schema_path = args.schema.unwrap_or(settings.generate.schema);
    let out_dir = args.out.unwrap_or(settings.generate.out_dir);
    let options = GenerateOptions {
        seed: args.seed.unwrap_or(settings.generate.seed),
        strict: args.strict || settings.generate.strict,
    };

    let timer = Instant::now();
    let document = load_schema_document(&schema_path)?;
    tracing::info!(
        schema = %schema_path.display(),
        entities = document.schema.entity_count(),
        "schema loaded"
    );

    let result = GenerationEngine::new(options).run(&document.schema)?;

    let bytes = write_dataset_json(&out_dir, &result.dataset)?;
    let report_path = write_report_json(&out_dir, &result.report)?;
    tracing::info!(
        out_dir = %out_dir.display(),
        files = result.dataset.len(),
        bytes,
        report = %report_path.display(),
        "dataset written"
    );

    let duration_ms = timer.elapsed().as_millis();
    tracing::info!(status = "success", duration_ms = duration_ms, "run finished");

    Ok(())
}

fn run_order(args: OrderArgs) -> Result<(), CliError> {
    let settings = setup(&args.config)?;
    let schema_path = args.schema.unwrap_or(settings.generate.schema);

    let document = load_schema_document(&schema_path)?;
    let report = build_relation_graph_report(&document.schema);
    if report.has_cycle() {
        tracing::warn!(cycles = report.cycles.len(), "relation graph contains cycles");
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn run_json_schema() -> Result<(), CliError> {
    let schema = schemars::schema_for!(mocksmith_core::SchemaDocument);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
