//! `stamina` batch driver.

use clap::Parser;
use stamina_cli::logging::init_logging;

mod cli;
mod commands;
mod summary;
mod types;

use crate::cli::{Cli, Command};
use crate::commands::{run_build, run_families, run_names};
use crate::summary::print_summary;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    if let Err(error) = init_logging(&cli.log_config()) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let config = cli.config.as_deref();
    // Ok(true) when the run finished but some job failed.
    let outcome = match &cli.command {
        Command::Build(args) => run_build(args, config).map(|result| {
            print_summary(&result);
            result.has_failures()
        }),
        Command::Families => run_families(config).map(|()| false),
        Command::Names(args) => run_names(args, config).map(|()| false),
    };
    let exit_code = match outcome {
        Ok(false) => 0,
        Ok(true) => 1,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}
