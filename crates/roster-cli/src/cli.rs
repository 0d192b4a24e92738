//! CLI argument definitions for the roster checker.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "roster",
    version,
    about = "Check filière/classe codes in a student roster and compile class rosters",
    long_about = "Classify every student of a roster against the official filière/classe \
                  table, export the flagged students, and compile one roster per classe.\n\n\
                  Reads CSV exports of the enrollment spreadsheet (codes in column I, \
                  headers on row 3 by default)."
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

    /// Allow student names and phone numbers in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Classify every student and report enrollment errors.
    Check(CheckArgs),

    /// Classify, then write one roster CSV per classe.
    Compile(CompileArgs),

    /// Show the built-in filière/classe table.
    Taxonomy(TaxonomyArgs),
}

/// Input file, configuration and overrides shared by `check` and `compile`.
#[derive(Args)]
pub struct InputArgs {
    /// Roster CSV exported from the enrollment spreadsheet.
    #[arg(value_name = "ROSTER")]
    pub input: PathBuf,

    /// TOML configuration file.
    #[arg(long = "config", short = 'c', value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Column holding the groups cell: a letter (I, AA) or a header name.
    #[arg(long = "codes-column", value_name = "COLUMN")]
    pub codes_column: Option<String>,

    /// 1-based row holding the headers.
    #[arg(long = "header-row", value_name = "ROW")]
    pub header_row: Option<usize>,

    /// 1-based row of the first student.
    #[arg(long = "data-row", value_name = "ROW")]
    pub data_start_row: Option<usize>,

    /// Family name column (detected from headers when omitted).
    #[arg(long = "family-name-column", value_name = "COLUMN")]
    pub family_name_column: Option<String>,

    /// Given name column (detected from headers when omitted).
    #[arg(long = "given-name-column", value_name = "COLUMN")]
    pub given_name_column: Option<String>,

    /// Input field delimiter.
    #[arg(long = "delimiter", value_name = "CHAR")]
    pub delimiter: Option<char>,

    /// How a single filière/classe pair is judged consistent.
    #[arg(long = "consistency", value_enum)]
    pub consistency: Option<ConsistencyArg>,

    /// Language of diagnosis labels in exports and tables.
    #[arg(long = "locale", value_enum)]
    pub locale: Option<LocaleArg>,
}

#[derive(Parser)]
pub struct CheckArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Write the flagged students (Nom, Prénom, Diagnostic) to this CSV.
    #[arg(long = "errors", value_name = "PATH")]
    pub errors: Option<PathBuf>,

    /// Write the per-diagnosis breakdown to this CSV.
    #[arg(long = "breakdown", value_name = "PATH")]
    pub breakdown: Option<PathBuf>,

    /// Write every augmented record to this JSON file.
    #[arg(long = "json", value_name = "PATH")]
    pub json: Option<PathBuf>,

    /// Exit with status 1 when any student is flagged.
    #[arg(long = "fail-on-errors")]
    pub fail_on_errors: bool,
}

#[derive(Parser)]
pub struct CompileArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Directory receiving the roster CSVs.
    #[arg(long = "output-dir", short = 'o', value_name = "DIR", default_value = "rosters")]
    pub output_dir: PathBuf,

    /// Nest rosters under one directory per filière.
    #[arg(long = "grouped")]
    pub grouped: bool,

    /// Place classe-only exception codes in their own classe roster.
    #[arg(long = "include-exceptions")]
    pub include_exceptions: bool,

    /// Drop a student from every roster ("Family name,Given name"); repeatable.
    #[arg(long = "exclude", value_name = "FAMILY,GIVEN")]
    pub exclude: Vec<String>,

    /// Also write the flagged students to <DIR>/erreurs_groupes.csv.
    #[arg(long = "with-errors")]
    pub with_errors: bool,
}

#[derive(Parser)]
pub struct TaxonomyArgs {
    /// Print the registry doctor report as JSON.
    #[arg(long = "doctor")]
    pub doctor: bool,

    /// Validate a candidate table file instead of showing the built-in one.
    #[arg(long = "validate", value_name = "PATH")]
    pub validate: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ConsistencyArg {
    Membership,
    LabelEquality,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LocaleArg {
    Fr,
    En,
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
