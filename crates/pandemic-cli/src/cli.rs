//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "pandemic-prep",
    version,
    about = "Prepare COVID-19 and vaccination data for pandemic preparedness models",
    long_about = "Validate, clean, enrich and integrate country-level COVID-19 case/death\n\
                  and vaccination tables, then cut regression and classification inputs.\n\n\
                  Datasets are read from and written to a layered data directory\n\
                  (01_raw, 02_intermediate, 03_primary, 04_feature, 05_model_input, 08_reporting)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for humans, json for machines).
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
    /// Run a registered pipeline against a data directory.
    Run(RunArgs),

    /// Check that the raw datasets exist and look usable.
    Doctor(DoctorArgs),

    /// List registered pipelines and their nodes.
    Pipelines,

    /// Print the effective pipeline configuration as JSON.
    Config(ConfigArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Data directory holding 01_raw/ and receiving the outputs.
    #[arg(long = "data-dir", value_name = "DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Registered pipeline to run.
    #[arg(long = "pipeline", value_name = "NAME", default_value = "__default__")]
    pub pipeline: String,

    /// Only run nodes carrying this tag (repeatable).
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// JSON file overriding column lists and imputation rules.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Run every stage without writing any dataset.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct DoctorArgs {
    #[arg(long = "data-dir", value_name = "DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Print the report as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct ConfigArgs {
    /// JSON file to merge over the defaults before printing.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,
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
