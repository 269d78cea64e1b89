//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "pagestat",
    version,
    about = "Decode scraped page-statistics tables into typed snapshots",
    long_about = "Decode flat, scraped page-statistics tables into typed, nested\n\
                  page snapshots: scalar cells coerced, repeated-group columns\n\
                  folded into ordered sub-record lists."
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
    /// Decode a scraped CSV file into page snapshots and print a summary.
    Ingest(IngestArgs),

    /// List the expected column layout of the scraped table.
    Columns,
}

#[derive(Parser)]
pub struct IngestArgs {
    /// Path to the scraped CSV file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Require every expected scalar column to be present in the header.
    ///
    /// Without this flag missing scalar columns fall back to their
    /// documented empty-cell defaults.
    #[arg(long = "check-headers")]
    pub check_headers: bool,
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
