//! CLI entry point for the insight engine.

use anyhow::{Context, Result, anyhow};
use clap::{Args as ClapArgs, Parser, Subcommand};
use dotenv::dotenv;
use lex_insight::{
    AnalysisConfig, AnalysisReport, AnomalyDetector, AnomalyMethod, InsightEngine, JsonFileStore,
    ReportGenerator, ReportStore, Table, loader,
};
use std::path::Path;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    author = "Lex Machina Team",
    version,
    about = "Automatic first-look analysis for tabular datasets",
    long_about = "Profiles a CSV dataset and reports data quality, correlations, \
                  relationships, distributions, anomalies and chart suggestions.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  CORRELATION_THRESHOLD             Strong correlation cutoff (default 0.7)\n  \
                  OUTLIER_Z_SCORE_THRESHOLD         Z-score outlier cutoff (default 3.0)\n  \
                  CATEGORICAL_VARIANCE_THRESHOLD    Group variation cutoff (default 0.3)\n\n\
                  EXAMPLES:\n  \
                  # Analyze a file\n  \
                  lex-insight analyze -i data.csv\n\n  \
                  # JSON report on stdout\n  \
                  lex-insight analyze -i data.csv --json | jq .data_quality\n\n  \
                  # Built-in sample dataset\n  \
                  lex-insight sample\n\n  \
                  # IQR outliers of one column\n  \
                  lex-insight anomalies -i data.csv -c revenue --method iqr"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a CSV file
    Analyze {
        /// Path to the CSV file to analyze
        #[arg(short, long)]
        input: String,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Analyze the built-in six-month sales sample
    Sample {
        #[command(flatten)]
        output: OutputArgs,
    },
    /// List outlier row indices of one numeric column
    Anomalies {
        /// Path to the CSV file to analyze
        #[arg(short, long)]
        input: String,

        /// Column to scan
        #[arg(short, long)]
        column: String,

        /// Detection method (zscore or iqr)
        #[arg(short, long, default_value = "zscore")]
        method: AnomalyMethod,

        /// Z-score outlier threshold, overrides OUTLIER_Z_SCORE_THRESHOLD
        #[arg(long)]
        outlier_threshold: Option<f64>,
    },
}

#[derive(ClapArgs, Debug)]
struct OutputArgs {
    /// Strong correlation threshold (0.0 - 1.0), overrides CORRELATION_THRESHOLD
    #[arg(long)]
    correlation_threshold: Option<f64>,

    /// Z-score outlier threshold, overrides OUTLIER_Z_SCORE_THRESHOLD
    #[arg(long)]
    outlier_threshold: Option<f64>,

    /// Group variation threshold, overrides CATEGORICAL_VARIANCE_THRESHOLD
    #[arg(long)]
    variance_threshold: Option<f64>,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all progress logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,

    /// Write the JSON report to this directory as <input_name>_insights.json
    #[arg(short = 'r', long, value_name = "DIR")]
    emit_report: Option<String>,

    /// Persist the report in a JSON file store rooted at this directory
    #[arg(long, value_name = "DIR")]
    store: Option<String>,
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
    let cli = Cli::parse();

    match &cli.command {
        Command::Analyze { input, output } => {
            init_logging(&cli.log_level, cli.quiet, output.json);
            dotenv().ok();

            let table = loader::load_csv(input).with_context(|| format!("Loading {input}"))?;
            let source = Path::new(input)
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or(input)
                .to_string();
            run_analysis(&table, &source, output)
        }
        Command::Sample { output } => {
            init_logging(&cli.log_level, cli.quiet, output.json);
            dotenv().ok();
            run_analysis(&loader::sample_table()?, "sample_data.csv", output)
        }
        Command::Anomalies {
            input,
            column,
            method,
            outlier_threshold,
        } => {
            init_logging(&cli.log_level, cli.quiet, false);
            dotenv().ok();
            run_anomalies(input, column, *method, *outlier_threshold)
        }
    }
}

/// Analyze a loaded table and emit the report per the output flags.
fn run_analysis(table: &Table, source: &str, output: &OutputArgs) -> Result<()> {
    let engine = InsightEngine::try_new(build_config(output, source)?)?;

    let report = engine.analyze(table).map_err(|e| {
        error!("Analysis failed: {}", e);
        anyhow!("Analysis failed: {} ({})", e, e.error_code())
    })?;

    handle_output(&report, source, output)
}

/// Environment first, then explicit flags on top.
fn build_config(args: &OutputArgs, source: &str) -> Result<AnalysisConfig> {
    let mut config = AnalysisConfig::from_env()?;
    config.source_name = source.to_string();

    if let Some(threshold) = args.correlation_threshold {
        config.correlation_threshold = threshold;
    }
    if let Some(threshold) = args.outlier_threshold {
        config.outlier_z_threshold = threshold;
    }
    if let Some(threshold) = args.variance_threshold {
        config.categorical_numeric_variance_threshold = threshold;
    }

    Ok(config)
}

/// Print the outlier row indices of one column, one per line.
fn run_anomalies(
    input: &str,
    column: &str,
    method: AnomalyMethod,
    outlier_threshold: Option<f64>,
) -> Result<()> {
    let mut config = AnalysisConfig::from_env()?;
    if let Some(threshold) = outlier_threshold {
        config.outlier_z_threshold = threshold;
    }
    config.validate()?;

    let table = loader::load_csv(input).with_context(|| format!("Loading {input}"))?;
    let result = AnomalyDetector::detect_named(&table, column, method, config.outlier_z_threshold)?
        .ok_or_else(|| anyhow!("Column '{column}' is not numeric"))?;

    info!(
        column,
        method = %result.method,
        flagged = result.indices.len(),
        "Anomaly scan complete"
    );
    for index in &result.indices {
        println!("{index}");
    }
    Ok(())
}

/// Handle report output based on CLI flags.
///
/// Output behavior:
/// - Default: Print human-readable summary to stdout
/// - `--json`: Print JSON to stdout only (no logs)
/// - `--emit-report`: Also write JSON report to file
/// - `--store`: Also persist the report in a file store
fn handle_output(report: &AnalysisReport, source: &str, args: &OutputArgs) -> Result<()> {
    if let Some(dir) = &args.emit_report {
        let generator = ReportGenerator::new(dir);
        let report_path = generator.write_report_to_file(report, &extract_file_stem(source))?;
        info!("Report written to: {}", report_path.display());
    }

    if let Some(dir) = &args.store {
        let store = JsonFileStore::open(dir)?;
        let id = store.save(report)?;
        store.close();
        info!("Report stored as {} in {}", id, dir);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!();
    println!("{}", "=".repeat(80));
    println!("ANALYSIS COMPLETE");
    println!("{}", "=".repeat(80));
    println!();
    print!("{}", ReportGenerator::render_summary(report));
    println!();
    println!("Completed in {} ms", report.metadata.duration_ms);

    Ok(())
}

/// Extract the file stem (name without extension) from a path.
fn extract_file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}
