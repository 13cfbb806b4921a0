//! Command-line entry point for bootconfig.

use std::process::ExitCode;

use clap::{CommandFactory, Parser};

use bootconfig::cli::Cli;
use bootconfig::commands::apply::{self, MISSING_CONFIG_HELP};
use bootconfig::error::ConfigError;
use bootconfig::logging::{self, Logger};

fn main() -> ExitCode {
    let args = Cli::parse();
    let log = Logger::new();
    if !logging::init_subscriber(args.verbose, args.log_file.as_deref())
        && let Some(path) = &args.log_file
    {
        log.warn(&format!("cannot open log file {}", path.display()));
    }

    match apply::run(&args, &log) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(err @ ConfigError::NotFound { .. }) = e.downcast_ref::<ConfigError>() {
                print_missing_config(err);
            } else {
                log.error(&format!("{e:#}"));
            }
            ExitCode::FAILURE
        }
    }
}

#[allow(clippy::print_stderr)]
fn print_missing_config(err: &ConfigError) {
    eprintln!(
        "error: {err}\n\n{MISSING_CONFIG_HELP}\n\n{}",
        Cli::command().render_usage()
    );
}
