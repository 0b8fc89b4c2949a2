//! `taxel` command-line tool.

use std::io::{self, IsTerminal};

use clap::Parser;

mod cli;
mod commands;
mod logging;

use crate::cli::{Cli, Command, LogFormatArg};
use crate::commands::{
    SETUP_HINT, exit_code, run_eric_check, run_extract, run_generate, run_send, run_validate,
};
use crate::logging::{LogConfig, LogFormat, init_logging};

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_logging(&log_config_from_cli(&cli)) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let result = match &cli.command {
        Command::Extract(args) => run_extract(args),
        Command::Generate(args) => run_generate(args),
        Command::Validate(args) => run_validate(args),
        Command::Send(args) => run_send(args),
        Command::EricCheck(args) => run_eric_check(args),
    };

    if let Err(error) = result {
        eprintln!("error: {error:#}");
        let code = exit_code(&error);
        if code == 2 {
            eprintln!("\n{SETUP_HINT}");
        }
        std::process::exit(code);
    }
}

fn log_config_from_cli(cli: &Cli) -> LogConfig {
    LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        format: match cli.log_format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
        },
        with_ansi: cli.log_file.is_none() && io::stderr().is_terminal(),
        log_file: cli.log_file.clone(),
    }
}
