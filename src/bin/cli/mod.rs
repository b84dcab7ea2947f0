//! CLI Module Organization
//!
//! - args: flag definitions and conversion into the engine configuration
//! - commands: dry-run and apply execution, exit code mapping

pub mod args;
pub mod commands;

pub use args::Cli;
pub use commands::{exit_code_for, run};

use tracing_subscriber::EnvFilter;

/// Install the process-wide log subscriber. Call once, before running.
///
/// `RUST_LOG` takes precedence; otherwise `--verbose` selects `debug` and
/// the default is `info`. Logs go to stderr so stdout only carries the
/// dry-run listing.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
