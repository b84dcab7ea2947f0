//! test-namer CLI - rename Python test modules from sentinel metadata.

use std::process::ExitCode;

use clap::Parser;

mod cli;

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    cli::init_logging(cli.verbose);

    match cli::run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(cli::exit_code_for(&err))
        }
    }
}
