//! CLI entry point for the loan preprocessing pipeline.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use loan_processing::{Pipeline, PipelineConfig, PipelineResult};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Rows scanned for dtype inference. Loan exports have long runs of empty
/// cells at the top of sparse columns.
const INFER_SCHEMA_ROWS: usize = 10_000;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Loan feature preprocessing pipeline",
    long_about = "Turns a raw loan-application CSV into a numeric, null-free feature table.\n\n\
                  EXAMPLES:\n  \
                  # Basic usage\n  \
                  loan-processing -i loans.csv -o features.csv\n\n  \
                  # Binarize the loan status and keep a run summary\n  \
                  loan-processing -i loans.csv -o features.csv --target loan_status --summary run.json"
)]
struct Args {
    /// Path to the raw loan CSV file
    #[arg(short, long)]
    input: PathBuf,

    /// Path of the processed CSV file to write
    #[arg(short, long)]
    output: PathBuf,

    /// Loan status column to collapse into a 0/1 outcome
    ///
    /// If not specified, the status column is one-hot encoded like any other text column
    #[arg(short, long)]
    target: Option<String>,

    /// Missing column threshold (0.0 - 1.0)
    #[arg(long, default_value = "0.7")]
    missing_col_threshold: f64,

    /// Write the run summary as JSON to this path
    #[arg(short, long)]
    summary: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings, errors and the final result)
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// `RUST_LOG` takes precedence over `--log-level`.
fn init_logging(level: &str, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, args.quiet);

    if !args.input.exists() {
        return Err(anyhow!("Input file not found: {}", args.input.display()));
    }

    let mut config_builder =
        PipelineConfig::builder().missing_column_threshold(args.missing_col_threshold);
    if let Some(ref target) = args.target {
        config_builder = config_builder.target_column(target);
    }
    let config = config_builder.build()?;

    info!("Loading dataset from: {}", args.input.display());
    let data = load_csv(&args.input)?;
    info!("Dataset loaded successfully: {:?}", data.shape());

    let pipeline = Pipeline::builder()
        .config(config)
        .on_progress(|update| {
            debug!(
                "[{:>3.0}%] {}: {}",
                update.progress * 100.0,
                update.stage.display_name(),
                update.message
            );
        })
        .build()?;

    let mut result = match pipeline.process(data) {
        Ok(result) => result,
        Err(e) => {
            error!("Pipeline failed: {}", e);
            return Err(anyhow!("Pipeline failed [{}]: {}", e.error_code(), e));
        }
    };

    write_csv(&mut result.data, &args.output)?;
    info!("Processed dataset saved: {}", args.output.display());

    if let Some(ref summary_path) = args.summary {
        write_summary(&result, summary_path)?;
        info!("Summary written to: {}", summary_path.display());
    }

    print_summary(&result, &args);
    Ok(())
}

fn load_csv(path: &Path) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
        .with_context(|| format!("Could not parse CSV: {}", path.display()))
}

fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)
        .with_context(|| format!("Could not create output file: {}", path.display()))?;

    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .finish(df)?;
    Ok(())
}

fn write_summary(result: &PipelineResult, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&result.summary)?;
    std::fs::write(path, json)
        .with_context(|| format!("Could not write summary: {}", path.display()))?;
    Ok(())
}

/// Print the final result.
///
/// Uses `println!` so the result is visible regardless of log level.
fn print_summary(result: &PipelineResult, args: &Args) {
    let summary = &result.summary;

    println!("\n{}", "=".repeat(60));
    println!("PREPROCESSING COMPLETE");
    println!("{}", "=".repeat(60));
    println!("  Input:    {}", args.input.display());
    println!("  Output:   {}", args.output.display());
    println!(
        "  Shape:    {} x {}  ->  {} x {}",
        summary.rows_before, summary.columns_before, summary.rows_after, summary.columns_after
    );
    println!("  Dropped:  {} columns", summary.dropped_columns.len());
    println!("  Imputed:  {} columns", summary.imputed_columns.len());
    println!("  Encoded:  {} columns", summary.encoded_columns.len());
    println!("  Duration: {} ms", summary.duration_ms);

    if !args.quiet && !summary.dropped_columns.is_empty() {
        println!("\nDROPPED COLUMNS");
        println!("{}", "-".repeat(40));
        for name in &summary.dropped_columns {
            println!("  - {}", name);
        }
    }
}
