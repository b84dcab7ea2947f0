//! Applying rename proposals to the filesystem.
//!
//! Every check runs before the first file moves: proposal shape, duplicate
//! destinations, collisions with files outside the batch, cross-device moves
//! and rename cycles. Once mutation starts, each move is a single atomic
//! rename and a failure stops the batch without rolling back earlier moves.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::core::errors::{NamerError, Result};
use crate::core::file_utils::{same_volume, FileRenamer};
use crate::naming::proposals::Proposal;

/// Outcome of a successful batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameReport {
    /// Proposals that moved a file, in the order they were performed
    pub renamed: Vec<Proposal>,
    /// Proposals whose file already had the proposed name
    pub unchanged: usize,
}

/// One filesystem move in an execution plan.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RenameStep {
    from: PathBuf,
    to: PathBuf,
    /// Proposal completed by this step; `None` for a temporary parking move
    proposal: Option<usize>,
}

#[derive(Debug, Default)]
struct RenamePlan {
    steps: Vec<RenameStep>,
    has_cycle: bool,
}

/// Validates and performs a batch of renames
#[derive(Debug, Clone, Copy, Default)]
pub struct RenameApplier {
    force: bool,
}

impl RenameApplier {
    /// Applier with the given overwrite policy
    pub fn new(force: bool) -> Self {
        Self { force }
    }

    /// Validate, then move every file to its proposed path.
    pub fn apply(&self, proposals: &[Proposal]) -> Result<RenameReport> {
        let plan = self.checked_plan(proposals)?;

        let mut report = RenameReport {
            renamed: Vec::new(),
            unchanged: proposals.iter().filter(|p| p.is_noop()).count(),
        };

        for step in plan.steps {
            match step.proposal {
                Some(_) => info!("[{}] -> [{}]", step.from.display(), step.to.display()),
                None => debug!("parking {} at {}", step.from.display(), step.to.display()),
            }
            FileRenamer::rename(&step.from, &step.to, self.force)?;
            if let Some(index) = step.proposal {
                report.renamed.push(proposals[index].clone());
            }
        }

        info!(
            "Renamed {} file(s), {} already named",
            report.renamed.len(),
            report.unchanged
        );
        Ok(report)
    }

    fn checked_plan(&self, proposals: &[Proposal]) -> Result<RenamePlan> {
        check_shape(proposals)?;
        check_duplicate_destinations(proposals)?;
        self.check_collisions(proposals)?;
        check_same_volume(proposals, same_volume)?;

        let plan = plan_moves(proposals);
        if plan.has_cycle && !self.force {
            let first = plan
                .steps
                .iter()
                .find(|step| step.proposal.is_none())
                .map(|step| step.from.as_path())
                .unwrap_or_else(|| Path::new(""));
            return Err(NamerError::rename(
                first,
                first,
                "proposals form a rename cycle; overwriting within the batch requires force",
            ));
        }
        Ok(plan)
    }

    fn check_collisions(&self, proposals: &[Proposal]) -> Result<()> {
        let origins: HashSet<&Path> = proposals.iter().map(Proposal::original).collect();
        for proposal in proposals {
            let target = proposal.proposed();
            if target.exists() && !origins.contains(target) {
                if !self.force {
                    return Err(NamerError::collision(target));
                }
                debug!("{} exists and will be overwritten", target.display());
            }
        }
        Ok(())
    }
}

/// Validate and apply `proposals` with the given overwrite policy.
pub fn apply_renames(proposals: &[Proposal], force: bool) -> Result<RenameReport> {
    RenameApplier::new(force).apply(proposals)
}

fn check_shape(proposals: &[Proposal]) -> Result<()> {
    for (index, proposal) in proposals.iter().enumerate() {
        for path in [proposal.original(), proposal.proposed()] {
            if path.as_os_str().is_empty() || path.file_name().is_none() {
                return Err(NamerError::validation_field(
                    format!(
                        "Malformed proposal #{}: {:?} is not a file path",
                        index + 1,
                        path
                    ),
                    "proposal",
                ));
            }
        }
    }
    Ok(())
}

fn check_duplicate_destinations(proposals: &[Proposal]) -> Result<()> {
    let mut seen = HashSet::new();
    for proposal in proposals {
        if !seen.insert(proposal.proposed()) {
            return Err(NamerError::validation_field(
                format!(
                    "Duplicate destination in proposals: {}",
                    proposal.proposed().display()
                ),
                "proposal",
            ));
        }
    }
    Ok(())
}

fn check_same_volume<F>(proposals: &[Proposal], on_same_volume: F) -> Result<()>
where
    F: Fn(&Path, &Path) -> bool,
{
    for proposal in proposals.iter().filter(|p| !p.is_noop()) {
        if !on_same_volume(proposal.original(), proposal.proposed()) {
            return Err(NamerError::unsupported(format!(
                "cross-device move from {} to {}",
                proposal.original().display(),
                proposal.proposed().display()
            )));
        }
    }
    Ok(())
}

/// Order the moves so no destination is written while it still holds a
/// pending origin. Cycles are broken by parking one file under a temporary
/// sibling name.
fn plan_moves(proposals: &[Proposal]) -> RenamePlan {
    let mut pending: Vec<(usize, PathBuf)> = proposals
        .iter()
        .enumerate()
        .filter(|(_, p)| !p.is_noop())
        .map(|(index, p)| (index, p.original().to_path_buf()))
        .collect();
    let mut reserved: HashSet<PathBuf> = HashSet::new();
    let mut plan = RenamePlan::default();

    while !pending.is_empty() {
        let ready = pending.iter().position(|(index, _)| {
            let target = proposals[*index].proposed();
            !pending.iter().any(|(_, current)| current == target)
        });

        match ready {
            Some(position) => {
                let (index, current) = pending.remove(position);
                plan.steps.push(RenameStep {
                    from: current,
                    to: proposals[index].proposed().to_path_buf(),
                    proposal: Some(index),
                });
            }
            None => {
                plan.has_cycle = true;
                let (_, current) = &mut pending[0];
                let parked = parking_path(current, &reserved);
                reserved.insert(parked.clone());
                plan.steps.push(RenameStep {
                    from: current.clone(),
                    to: parked.clone(),
                    proposal: None,
                });
                *current = parked;
            }
        }
    }

    plan
}

fn parking_path(path: &Path, reserved: &HashSet<PathBuf>) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut candidate = path.with_file_name(format!(".{}.renaming", name));
    let mut counter = 1;
    while candidate.exists() || reserved.contains(&candidate) {
        candidate = path.with_file_name(format!(".{}.renaming.{}", name, counter));
        counter += 1;
    }
    candidate
}
