//! CLI entry point for raw-versus-filtered model comparison.

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use rowsieve_eval::{ComparisonHarness, DEFAULT_SEED, DEFAULT_TEST_FRACTION, RidgeRegressor};
use rowsieve_filtering::{
    DEFAULT_IQR_FACTOR, DEFAULT_STD_FACTOR, IqrOutlierRemover, Preprocessor, StdOutlierRemover,
};
use std::path::PathBuf;
use tracing::info;

/// CLI-compatible outlier detection method enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutlierMethod {
    /// Bounds at mean +/- factor * sample standard deviation
    Std,
    /// Bounds at Q1 - factor * IQR and Q3 + factor * IQR
    Iqr,
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Compare model performance on raw versus outlier-filtered data",
    long_about = "Splits a dataset once, trains a linear baseline on the raw split, then\n\
                  refits after removing outlier rows (bounds learned from the training\n\
                  partition only) and reports both scores side by side.\n\n\
                  EXAMPLES:\n  \
                  # IQR filtering on two columns\n  \
                  rowsieve -i data.csv --target price --columns sqft,age\n\n  \
                  # Std-dev filtering with a custom factor and seed\n  \
                  rowsieve -i data.csv --target price --columns sqft --method std --factor 2.5 --seed 7"
)]
struct Args {
    /// Path to the CSV file to evaluate
    #[arg(short, long)]
    input: String,

    /// Target column to predict
    #[arg(short, long)]
    target: String,

    /// Numeric feature columns, also monitored for outliers
    #[arg(short, long, value_delimiter = ',', required = true)]
    columns: Vec<String>,

    /// Outlier detection method
    #[arg(long, value_enum, default_value = "iqr")]
    method: OutlierMethod,

    /// Multiplier for the dispersion statistic
    ///
    /// Defaults to 3.0 for std and 1.5 for iqr when not specified
    #[arg(long)]
    factor: Option<f64>,

    /// Fraction of rows held out for testing
    #[arg(long, default_value_t = DEFAULT_TEST_FRACTION)]
    test_fraction: f64,

    /// Seed for the randomized split
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and the result)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of the result table
    ///
    /// Disables all progress logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

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

    init_logging(&args.log_level, args.quiet, args.json);

    if !std::path::Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    info!("Loading dataset from: {}", args.input);
    let data = load_csv(&args.input)?;
    info!("Dataset loaded successfully: {:?}", data.shape());

    if args.columns.contains(&args.target) {
        return Err(anyhow!(
            "Target column '{}' cannot also be a feature column",
            args.target
        ));
    }

    let target = data
        .column(&args.target)
        .map_err(|_| anyhow!("Target column '{}' not found in dataset", args.target))?
        .as_materialized_series()
        .clone();
    let features = data
        .select(args.columns.iter().map(String::as_str))
        .context("Failed to select feature columns")?;

    let preprocessor: Box<dyn Preprocessor> = match args.method {
        OutlierMethod::Std => Box::new(
            StdOutlierRemover::new(args.columns.clone())
                .with_factor(args.factor.unwrap_or(DEFAULT_STD_FACTOR)),
        ),
        OutlierMethod::Iqr => Box::new(
            IqrOutlierRemover::new(args.columns.clone())
                .with_factor(args.factor.unwrap_or(DEFAULT_IQR_FACTOR)),
        ),
    };

    let mut harness = ComparisonHarness::new(Box::new(RidgeRegressor::default()))
        .with_preprocessor(preprocessor);

    let report = harness
        .compare_with(&features, &target, args.test_fraction, args.seed)
        .context("Comparison failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }

    Ok(())
}

/// Load a CSV file with header and schema inference.
fn load_csv(path: &str) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
        .context("Failed to read CSV file")
}
