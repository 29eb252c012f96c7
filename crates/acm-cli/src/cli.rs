//! CLI argument definitions for the mortality panel tool.

use std::path::PathBuf;

use acm_model::{DEFAULT_PERSONS_PER_CHUNK, PeriodKind, SourceKind};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "acm",
    version,
    about = "All-cause mortality panels - build person-period tables and rates",
    long_about = "Build person-period panels from insurer exports and compute\n\
                  all-cause mortality per 100 000 person-years by age band and\n\
                  vaccination status.\n\n\
                  Supports CPZP (weekly) and OZP (monthly) exports."
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
    /// Build and store the processed panel for one source export.
    Preprocess(PreprocessArgs),

    /// Compute mortality rates from a stored processed panel.
    Rates(RatesArgs),

    /// Print the period labels of a window.
    Periods(PeriodsArgs),

    /// List the supported source exports and their columns.
    Sources,
}

#[derive(Parser)]
pub struct PreprocessArgs {
    /// Source export (semicolon-separated CSV).
    #[arg(value_name = "SOURCE_CSV")]
    pub source_csv: PathBuf,

    /// Which insurer layout the export follows.
    #[arg(long = "source", value_enum)]
    pub source: SourceArg,

    /// First day of the observation window.
    #[arg(long = "from", value_name = "DATE", default_value = "2020-01-01")]
    pub from: NaiveDate,

    /// Last day of the observation window (inclusive).
    #[arg(long = "to", value_name = "DATE", default_value = "2022-12-30")]
    pub to: NaiveDate,

    /// Directory the processed panel is written to (default: next to SOURCE_CSV).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Persons expanded per chunk; bounds peak memory.
    #[arg(
        long = "chunk-size",
        value_name = "PERSONS",
        default_value_t = DEFAULT_PERSONS_PER_CHUNK
    )]
    pub chunk_size: usize,

    /// CSV field separator.
    #[arg(long = "separator", value_name = "CHAR", default_value_t = ';')]
    pub separator: char,
}

#[derive(Parser)]
pub struct RatesArgs {
    /// Processed panel written by `preprocess`.
    #[arg(value_name = "PROCESSED")]
    pub processed: PathBuf,

    /// Restrict to periods on or after this date.
    #[arg(long = "from", value_name = "DATE")]
    pub from: Option<NaiveDate>,

    /// Restrict to periods on or before this date.
    #[arg(long = "to", value_name = "DATE")]
    pub to: Option<NaiveDate>,

    /// Print the rate table as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct PeriodsArgs {
    #[arg(long = "kind", value_enum, default_value = "week")]
    pub kind: PeriodKindArg,

    #[arg(long = "from", value_name = "DATE", default_value = "2020-01-01")]
    pub from: NaiveDate,

    #[arg(long = "to", value_name = "DATE", default_value = "2022-12-30")]
    pub to: NaiveDate,
}

/// CLI source choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum SourceArg {
    Cpzp,
    Ozp,
}

impl From<SourceArg> for SourceKind {
    fn from(value: SourceArg) -> Self {
        match value {
            SourceArg::Cpzp => SourceKind::Cpzp,
            SourceArg::Ozp => SourceKind::Ozp,
        }
    }
}

/// CLI period kind choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum PeriodKindArg {
    Week,
    Month,
}

impl From<PeriodKindArg> for PeriodKind {
    fn from(value: PeriodKindArg) -> Self {
        match value {
            PeriodKindArg::Week => PeriodKind::Week,
            PeriodKindArg::Month => PeriodKind::Month,
        }
    }
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

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn preprocess_defaults() {
        let cli =
            Cli::try_parse_from(["acm", "preprocess", "data.csv", "--source", "ozp"]).unwrap();
        let Command::Preprocess(args) = cli.command else {
            panic!("expected preprocess");
        };
        assert_eq!(SourceKind::from(args.source), SourceKind::Ozp);
        assert_eq!(args.from, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(args.to, NaiveDate::from_ymd_opt(2022, 12, 30).unwrap());
        assert_eq!(args.chunk_size, DEFAULT_PERSONS_PER_CHUNK);
        assert_eq!(args.separator, ';');
    }

    #[test]
    fn rejects_malformed_dates() {
        let parsed = Cli::try_parse_from(["acm", "periods", "--from", "2021-13-01"]);
        assert!(parsed.is_err());
    }
}
