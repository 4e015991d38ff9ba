//! CLI argument definitions for the survey cleaner.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use survey_report::{DEFAULT_EXCLUDED_GROUP, DEFAULT_TREND_GROUP};

#[derive(Parser)]
#[command(
    name = "survey-clean",
    version,
    about = "Clean raw survey extracts into typed, gap-free tables",
    long_about = "Clean raw survey CSV extracts into typed, gap-free tables.\n\n\
                  Cleaned tables are written as CSV with a JSON type schema next\n\
                  to them; the report commands read those back."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Cleaning configuration (TOML). Defaults to the built-in sources.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Data directory holding raw/ and clean/ when no config file is given.
    #[arg(long = "data-dir", value_name = "DIR", default_value = "data", global = true)]
    pub data_dir: PathBuf,

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
    /// Clean every configured source and write the cleaned tables.
    Clean(CleanArgs),

    /// Print a data-quality report for cleaned tables.
    Report(ReportArgs),

    /// Describe number columns per group and subgroup.
    Describe(DescribeArgs),

    /// Print per-subgroup time series for one group.
    Trends(TrendsArgs),
}

#[derive(Parser)]
pub struct CleanArgs {
    /// Only clean these sources (by name). Repeatable.
    #[arg(long = "source", value_name = "NAME")]
    pub sources: Vec<String>,

    /// Fail when a column only partly matches a date or number pattern.
    #[arg(long = "strict-inference")]
    pub strict_inference: bool,
}

#[derive(Parser)]
pub struct ReportArgs {
    /// Only report on these sources (by name). Repeatable.
    #[arg(long = "source", value_name = "NAME")]
    pub sources: Vec<String>,
}

#[derive(Parser)]
pub struct DescribeArgs {
    /// Source to describe.
    #[arg(long = "source", value_name = "NAME", default_value = "anxiety_trends")]
    pub source: String,

    /// Groups left out of the description. Repeatable.
    #[arg(long = "exclude-group", value_name = "GROUP", default_value = DEFAULT_EXCLUDED_GROUP)]
    pub exclude_groups: Vec<String>,

    /// Describe every group, including the default exclusions.
    #[arg(long = "all-groups", conflicts_with = "exclude_groups")]
    pub all_groups: bool,
}

#[derive(Parser)]
pub struct TrendsArgs {
    /// Source to read.
    #[arg(long = "source", value_name = "NAME", default_value = "anxiety_trends")]
    pub source: String,

    /// Group whose subgroups become series.
    #[arg(long = "group", value_name = "GROUP", default_value = DEFAULT_TREND_GROUP)]
    pub group: String,
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
