//! Command Execution Logic
//!
//! Turns parsed flags into an engine run: build proposals, then either print
//! the dry run or apply the renames.

use std::io::{self, Write};

use anyhow::Context;
use console::style;
use tracing::{info, warn};

use test_namer_rs::{NamerEngine, NamerError};

use crate::cli::args::Cli;

/// Run the namer with the given flags
pub fn run(cli: &Cli) -> anyhow::Result<()> {
    if cli.import_root().is_some() && cli.repo_root.is_none() {
        warn!("--import-root has no effect without --repo-root; reading sentinels directly");
    }

    let engine = NamerEngine::new(cli.to_config())?;
    let proposals = engine
        .build_proposals()
        .with_context(|| format!("Failed to build proposals for {}", cli.test_root.display()))?;

    if !cli.apply {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        engine.write_dry_run(&proposals, &mut out)?;
        out.flush()?;
        return Ok(());
    }

    let report = engine.apply(&proposals, cli.force)?;
    info!("{} proposal(s) processed", proposals.len());
    eprintln!(
        "{} Renamed {} file(s), {} already named",
        style("✓").green().bold(),
        report.renamed.len(),
        report.unchanged
    );
    Ok(())
}

/// Process exit code for a failed run: 2 for validation failures, 1 otherwise
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    let validation = err.chain().any(|cause| {
        cause
            .downcast_ref::<NamerError>()
            .is_some_and(NamerError::is_validation)
    });
    if validation {
        2
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let validation = anyhow::Error::new(NamerError::validation("Invalid sentinel name"));
        assert_eq!(exit_code_for(&validation), 2);

        let wrapped = anyhow::Error::new(NamerError::validation("token too long")).context("Failed to build");
        assert_eq!(exit_code_for(&wrapped), 2);

        let collision = anyhow::Error::new(NamerError::collision("tests/test_misc_0001.py"));
        assert_eq!(exit_code_for(&collision), 1);
    }
}
