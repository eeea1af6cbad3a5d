//! The `svd-controller` CLI binary.

use std::process::ExitCode;

use clap::Parser;
use simplelog::{ColorChoice, Config as LogConfig, TermLogger, TerminalMode};
use svd_controller::cli::{Cli, Command};
use svd_controller::commands::{resolve, run};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(error) = TermLogger::init(
        cli.verbose.log_level_filter(),
        LogConfig::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("failed to initialize logger:\n{error}");
        return ExitCode::FAILURE;
    }

    let result = match cli.command {
        Command::Resolve { catalogs, names, format } => resolve(catalogs, names, format),
        Command::Run { catalog, namespace, ticks } => run(catalog, namespace, ticks),
    };

    if let Err(error) = result {
        eprintln!("{error}");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
