//! Command-line arguments.

use std::path::PathBuf;

use breath_ingest::TemplateFormat;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "breath",
    version,
    about = "Check training spreadsheets, retrain models and request predictions",
    long_about = "Check training spreadsheets, retrain models and request predictions.\n\n\
                  Uploads must be CSV, XLS or XLSX files containing the ten required\n\
                  columns. Use `breath template` to get an empty training file."
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

    /// Log output format.
    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow cell values from uploads to appear in logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Settings file to use instead of the default location.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Account email (overrides the settings file).
    #[arg(long = "email", value_name = "EMAIL", global = true)]
    pub email: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check that a file can be used for training.
    Check(FileArgs),

    /// Show the rows of a valid training file.
    Preview(PreviewArgs),

    /// Upload a file and train a model from it.
    Train(TrainArgs),

    /// List trained models.
    Models,

    /// Write an empty training template.
    Template(TemplateArgs),

    /// List diagnostic codes.
    Codes(CodesArgs),

    /// Request survival and readmission predictions for a patient.
    Predict(PredictArgs),
}

#[derive(Args)]
pub struct FileArgs {
    /// CSV, XLS or XLSX file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub input: FileArgs,

    /// Page to show, starting at 1.
    #[arg(long = "page", default_value_t = 1)]
    pub page: usize,

    /// Rows per page (default from settings).
    #[arg(long = "page-size")]
    pub page_size: Option<usize>,

    /// Print the preview as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct TrainArgs {
    #[command(flatten)]
    pub input: FileArgs,

    /// Name for the new model (at most 10 characters).
    #[arg(long = "model-name", short = 'n')]
    pub model_name: String,

    /// Diagnostic code the model predicts for.
    #[arg(long = "diagnostic-interest", short = 'd', default_value = "J44")]
    pub diagnostic_interest: String,
}

#[derive(Args)]
pub struct TemplateArgs {
    /// Output path (default: training.xlsx or training.csv).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Template file format (xlsx or csv).
    #[arg(long = "format", default_value_t = TemplateFormat::Xlsx)]
    pub format: TemplateFormat,
}

#[derive(Args)]
pub struct CodesArgs {
    /// Ask the dashboard service instead of using the configured list.
    #[arg(long = "remote")]
    pub remote: bool,
}

#[derive(Args)]
pub struct PredictArgs {
    /// Trained model to score with, sent to the training service.
    /// Without it the dashboard scores with its current model.
    #[arg(long = "model-id")]
    pub model_id: Option<i64>,

    /// Patient gender (female or male).
    #[arg(long = "gender")]
    pub gender: String,

    /// Patient age in years.
    #[arg(long = "age")]
    pub age: u32,

    /// Number of previous admissions.
    #[arg(long = "readmissions")]
    pub readmissions: u32,

    /// Diagnostic codes (repeat or comma-separate).
    #[arg(long = "code", value_delimiter = ',', required = true)]
    pub codes: Vec<String>,

    /// Print the raw response as JSON.
    #[arg(long = "json")]
    pub json: bool,
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
