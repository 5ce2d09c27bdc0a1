//! CLI argument definitions for the excipient extractor.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "excipients",
    version,
    about = "Extract and classify drug excipients from product spreadsheets",
    long_about = "Extract inactive-ingredient lists from drug product descriptions.\n\n\
                  Reads an .xlsx or .csv spreadsheet, locates the excipient text in each \
                  product description, and writes cleaned excipient and note lists as CSV."
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
    /// Write one row of excipients and notes per product record.
    Run(RunArgs),

    /// Write the sorted, distinct excipient names across all records.
    Catalog(CatalogArgs),

    /// Print the active vocabulary tables.
    Vocabulary(VocabularyArgs),
}

/// Options shared by the commands that process records.
#[derive(Args)]
pub struct ExtractionArgs {
    /// How the ingredient list is located in the description.
    #[arg(long = "strategy", value_enum, default_value = "multi-label")]
    pub strategy: StrategyArg,

    /// TOML vocabulary replacing the built-in tables.
    #[arg(long = "vocabulary", value_name = "PATH")]
    pub vocabulary: Option<PathBuf>,

    /// Keep tokens that repeat the product name as excipients.
    #[arg(long = "no-product-echo")]
    pub no_product_echo: bool,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Spreadsheet to read (.xlsx or .csv).
    #[arg(value_name = "INPUT", default_value = "input.xlsx")]
    pub input: PathBuf,

    /// CSV file to write.
    #[arg(value_name = "OUTPUT", default_value = "drug_excipients.csv")]
    pub output: PathBuf,

    #[command(flatten)]
    pub extraction: ExtractionArgs,

    /// Columns of the output table.
    #[arg(long = "layout", value_enum, default_value = "with-notes")]
    pub layout: LayoutArg,

    /// Keep only the first row for each product name.
    #[arg(long = "dedupe-products")]
    pub dedupe_products: bool,
}

#[derive(Parser)]
pub struct CatalogArgs {
    /// Spreadsheet to read (.xlsx or .csv).
    #[arg(value_name = "INPUT", default_value = "input.xlsx")]
    pub input: PathBuf,

    /// CSV file to write.
    #[arg(value_name = "OUTPUT", default_value = "cleaned_excipients.csv")]
    pub output: PathBuf,

    #[command(flatten)]
    pub extraction: ExtractionArgs,
}

#[derive(Parser)]
pub struct VocabularyArgs {
    /// TOML vocabulary to show instead of the built-in tables.
    #[arg(long = "vocabulary", value_name = "PATH")]
    pub vocabulary: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    SingleLabel,
    MultiLabel,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LayoutArg {
    WithNotes,
    ExcipientsOnly,
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
