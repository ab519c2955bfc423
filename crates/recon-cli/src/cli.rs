//! CLI argument definitions for the catalog reconciler.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "catalog-recon",
    version,
    about = "Catalog reconciler - align source records against a target catalog",
    long_about = "Reconcile two hierarchical catalogs by matching source records\n\
                  to target records within corresponding categories.\n\
                  Catalogs are supplied as JSON files."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
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
    /// Align a source catalog against a target catalog and print the match table.
    Align(AlignArgs),
    /// Show ranked target suggestions for one source record.
    Suggest(SuggestArgs),
    /// List match sets stored in a repository directory.
    Sets(SetsArgs),
}

#[derive(Args)]
pub struct AlignArgs {
    /// Source catalog JSON file.
    pub source: PathBuf,
    /// Target catalog JSON file.
    pub target: PathBuf,

    /// Only show this source category id.
    #[arg(long)]
    pub category: Option<String>,

    /// Also print top suggestions for unmatched source records.
    #[arg(long)]
    pub suggestions: bool,

    /// Persist the resulting match set under this directory.
    #[arg(long = "save-dir", value_name = "DIR")]
    pub save_dir: Option<PathBuf>,

    /// Label for the saved match set (defaults to the catalog file stems).
    #[arg(long)]
    pub label: Option<String>,
}

#[derive(Args)]
pub struct SuggestArgs {
    /// Source catalog JSON file.
    pub source: PathBuf,
    /// Target catalog JSON file.
    pub target: PathBuf,

    /// Source record id to suggest targets for.
    #[arg(long)]
    pub item: String,
}

#[derive(Args)]
pub struct SetsArgs {
    /// Repository directory holding stored match sets.
    #[arg(long)]
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
