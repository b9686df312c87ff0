//! Tabular analysis CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

use insight_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg, OutputFormatArg};
use insight_cli::commands::{EXIT_FAILURE, exit_code_for, run_analyze, run_tables};
use insight_cli::logging::{LogConfig, LogFormat, init_logging};
use insight_cli::summary::{print_analysis, print_tables};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(EXIT_FAILURE);
    }
    let exit_code = match cli.command {
        Command::Tables(args) => match run_tables(&args.data_dir) {
            Ok(tables) => {
                print_tables(&tables);
                0
            }
            Err(error) => report(&error),
        },
        Command::Analyze(args) => match run_analyze(&args) {
            Ok(result) => match args.output {
                OutputFormatArg::Json => match serde_json::to_string_pretty(&result) {
                    Ok(json) => {
                        println!("{json}");
                        0
                    }
                    Err(error) => report(&error.into()),
                },
                OutputFormatArg::Table => {
                    print_analysis(&result);
                    0
                }
            },
            Err(error) => report(&error),
        },
    };
    std::process::exit(exit_code);
}

fn report(error: &anyhow::Error) -> i32 {
    eprintln!("error: {error:#}");
    exit_code_for(error)
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
