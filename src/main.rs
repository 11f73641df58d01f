use anyhow::Context;
use clap::{Parser, Subcommand};
use configuration::{Overrides, load_config};
use loader::{MissingValueSummary, SeriesLoader};
use pricelens::pipeline;
use reporting::preview::{indicator_preview, missing_values_table, raw_preview};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// The main entry point for the pricelens application.
fn main() -> anyhow::Result<()> {
    // Load PRICELENS__* overrides from a .env file, if there is one.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Execute the appropriate command
    match cli.command {
        Commands::Analyze(args) => handle_analyze(args),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Moving averages and returns for a daily price series.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a price file, derive the indicators and write the report.
    Analyze(AnalyzeArgs),
}

#[derive(Parser)]
struct AnalyzeArgs {
    /// Configuration file (defaults to ./pricelens.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also write logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    overrides: Overrides,
}

// ==============================================================================
// Analyze Command Logic
// ==============================================================================

/// Handles the orchestration of one analysis run.
fn handle_analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let _guard = init_tracing(args.log_file.as_deref())?;

    let mut config = load_config(args.config.as_deref()).context("Failed to load configuration")?;
    config
        .apply(&args.overrides)
        .context("Invalid command-line overrides")?;
    let preview_rows = config.report.preview_rows;

    tracing::info!(
        ticker = %config.data.ticker,
        input = %config.data.input_path.display(),
        "Starting analysis."
    );

    let loader = pipeline::loader_for(&config);
    let rows = loader
        .load()
        .with_context(|| format!("Failed to load {}", loader.path().display()))?;

    println!("\n--- FIRST {} ROWS OF DATA ---", preview_rows);
    println!("{}", raw_preview(&rows[..preview_rows.min(rows.len())]));

    let summary = MissingValueSummary::from_rows(&rows);
    println!("\n--- MISSING VALUES ---");
    println!("{}", missing_values_table(&summary));
    if !summary.is_complete() {
        tracing::warn!(missing = summary.total(), "Input has missing values.");
    }

    let table = pipeline::analyze(rows, config.indicators)?;

    println!("\n--- LAST {} ROWS ---", preview_rows);
    println!(
        "{}",
        indicator_preview(table.tail(preview_rows), table.short_window(), table.long_window())
    );

    println!("\nFinal return: {}", table.final_return());

    for path in pipeline::save(&table, &config)? {
        println!("\nSaved file at: {}", absolute(&path).display());
    }

    Ok(())
}

/// Sets up console logging and, when asked, a second plain-text log file.
///
/// The returned guard must stay alive until the program exits so buffered
/// file output is flushed.
fn init_tracing(log_file: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let console = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .with_context(|| format!("Log file path {} has no file name", path.display()))?;
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init()
        .context("Failed to install the tracing subscriber")?;

    Ok(guard)
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
