//! CLI argument parsing for abreport

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the stdout summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "abreport")]
#[command(version)]
#[command(about = "Statistical analysis and reporting for checklist vs calendar A/B tests", long_about = None)]
pub struct Cli {
    /// Survey results CSV (one row per participant)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Directory for charts, report.md, summary.csv and analysis.json
    #[arg(
        short = 'o',
        long = "output-dir",
        value_name = "DIR",
        default_value = "abreport-output"
    )]
    pub output_dir: PathBuf,

    /// Analysis configuration file (TOML)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Significance level, overrides the config file
    #[arg(long = "alpha", value_name = "ALPHA")]
    pub alpha: Option<f64>,

    /// Confidence level for mean-difference intervals, overrides the config file
    #[arg(long = "confidence", value_name = "LEVEL")]
    pub confidence: Option<f64>,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Skip chart rendering
    #[arg(long = "no-charts")]
    pub no_charts: bool,

    /// Log pipeline progress to stderr
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug tracing output to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}
