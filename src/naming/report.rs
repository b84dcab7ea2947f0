//! Dry-run presentation of proposals.

use std::io::{self, Write};

use crate::naming::proposals::Proposal;

/// Header line of a dry-run listing.
pub const DRY_RUN_HEADER: &str = "DRY RUN - original | proposed";

/// Write one `<original> | <proposed-name>` line per proposal, preceded by
/// the header and followed by a blank line and the count.
pub fn write_dry_run<W: Write>(proposals: &[Proposal], out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", DRY_RUN_HEADER)?;
    for proposal in proposals {
        writeln!(
            out,
            "{} | {}",
            proposal.original().display(),
            proposal.proposed_name()
        )?;
    }
    writeln!(out)?;
    writeln!(out, "Proposals: {} (use --apply to perform)", proposals.len())?;
    Ok(())
}
