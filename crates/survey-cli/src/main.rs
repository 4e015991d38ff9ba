//! Survey cleaner CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use survey_cli::config::load_config;
use survey_cli::logging::{LogConfig, LogFormat, init_logging};
use survey_output::PersistError;
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;
mod types;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_clean, run_describe, run_report, run_trends};
use crate::summary::{print_clean_summary, print_descriptions, print_quality_reports, print_trends};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli) {
        Ok(code) => code,
        Err(error) => {
            report_error(&error);
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> anyhow::Result<i32> {
    let config = load_config(cli.config.as_deref(), &cli.data_dir)?;
    match &cli.command {
        Command::Clean(args) => {
            let result = run_clean(&config, args)?;
            print_clean_summary(&result);
            Ok(if result.has_errors() { 1 } else { 0 })
        }
        Command::Report(args) => {
            print_quality_reports(&run_report(&config, args)?);
            Ok(0)
        }
        Command::Describe(args) => {
            print_descriptions(&run_describe(&config, args)?);
            Ok(0)
        }
        Command::Trends(args) => {
            print_trends(&args.group, &run_trends(&config, args)?);
            Ok(0)
        }
    }
}

/// Print an error, with remediation when it comes from the persisted tables.
fn report_error(error: &anyhow::Error) {
    let persist = error
        .chain()
        .find_map(|cause| cause.downcast_ref::<PersistError>());
    match persist {
        Some(persist) => {
            eprintln!("error: {}", persist.user_message());
            if let Some(hint) = persist.suggestion() {
                eprintln!("hint: {hint}");
            }
        }
        None => eprintln!("error: {error:#}"),
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
