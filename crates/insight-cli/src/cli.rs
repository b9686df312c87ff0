//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "insight",
    version,
    about = "Clean a table, flag anomalies and forecast a target column",
    long_about = "Clean and normalize a tabular dataset, flag anomalous values of a \
                  target column and forecast its next periods.\n\n\
                  Tables are the CSV files of a data directory, named by file stem."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the tables of a data directory and their columns.
    Tables(TablesArgs),

    /// Run the analysis pipeline on one table.
    Analyze(AnalyzeArgs),
}

#[derive(Parser)]
pub struct TablesArgs {
    /// Directory containing one CSV file per table.
    #[arg(value_name = "DATA_DIR")]
    pub data_dir: PathBuf,
}

#[derive(Parser, Default)]
pub struct AnalyzeArgs {
    /// Directory containing one CSV file per table.
    #[arg(value_name = "DATA_DIR")]
    pub data_dir: PathBuf,

    /// Table to analyze (CSV file stem).
    #[arg(long = "table")]
    pub table: Option<String>,

    /// Numeric column to score and forecast.
    #[arg(long = "target")]
    pub target: Option<String>,

    /// Column holding observation dates.
    #[arg(long = "date")]
    pub date: Option<String>,

    /// Maximum rows fetched from the table (default 10000).
    #[arg(long = "limit")]
    pub limit: Option<usize>,

    /// Upper bound on fetched rows; also caps the anomaly working set.
    #[arg(long = "max-rows")]
    pub max_rows: Option<usize>,

    /// Anomaly method: zscore or isolation_forest. Unknown names fall back
    /// to zscore with a warning.
    #[arg(long = "anomaly-method")]
    pub anomaly_method: Option<String>,

    /// Forecast method: linear_regression or holt_winters. Unknown names
    /// fall back to linear_regression with a warning.
    #[arg(long = "forecast-method")]
    pub forecast_method: Option<String>,

    /// Z-score threshold (default 3.0).
    #[arg(long = "threshold")]
    pub threshold: Option<f64>,

    /// Number of future periods to forecast (default 3).
    #[arg(long = "periods")]
    pub periods: Option<usize>,

    /// Seed for every sampling path (default 42).
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// JSON request file; explicit flags override its fields.
    #[arg(long = "request", value_name = "FILE")]
    pub request: Option<PathBuf>,

    /// How to print the result.
    #[arg(long = "output", value_enum, default_value = "json")]
    pub output: OutputFormatArg,
}

#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, ValueEnum)]
pub enum OutputFormatArg {
    /// The serialized result envelope.
    #[default]
    Json,
    /// Summary tables.
    Table,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
