//! Main naming engine implementation.

use std::io::Write;

use tracing::info;

use crate::core::config::NamerConfig;
use crate::core::errors::{NamerError, Result};
use crate::naming::apply::{RenameApplier, RenameReport};
use crate::naming::proposals::{Proposal, ProposalBuilder};
use crate::naming::report::write_dry_run;

/// Entry point for front-ends: plan renames, show them, apply them
#[derive(Debug)]
pub struct NamerEngine {
    config: NamerConfig,
}

impl NamerEngine {
    /// Create an engine; the configuration is validated immediately
    pub fn new(config: NamerConfig) -> Result<Self> {
        config.validate()?;
        info!(
            "Initializing test namer for {} (sentinel {})",
            config.test_root.display(),
            config.sentinel
        );
        Ok(Self { config })
    }

    /// Engine configuration
    pub fn config(&self) -> &NamerConfig {
        &self.config
    }

    /// Scan the test tree and plan a name for every eligible file
    pub fn build_proposals(&self) -> Result<Vec<Proposal>> {
        if let Some((import_root, repo_root)) = self.config.aggregation() {
            info!(
                "Aggregating sentinels through imports under {} in {}",
                import_root,
                repo_root.display()
            );
        }
        ProposalBuilder::new(&self.config)?.build()
    }

    /// Print the proposals as a dry run
    pub fn write_dry_run<W: Write>(&self, proposals: &[Proposal], out: &mut W) -> Result<()> {
        write_dry_run(proposals, out).map_err(|e| NamerError::io("Failed to write dry-run report", e))
    }

    /// Perform the proposals on disk
    pub fn apply(&self, proposals: &[Proposal], force: bool) -> Result<RenameReport> {
        info!("Applying {} proposal(s){}", proposals.len(), if force { " with overwrite" } else { "" });
        RenameApplier::new(force).apply(proposals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_engine_rejects_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = NamerConfig::new(dir.path().join("missing"));
        assert!(NamerEngine::new(config).unwrap_err().is_validation());
    }

    #[test]
    fn test_build_then_apply() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("tests");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("test_alpha.py"), "DOMAINS = ['alpha']\n").unwrap();
        fs::write(root.join("test_bravo.py"), "DOMAINS = ['alpha']\n").unwrap();

        let engine = NamerEngine::new(NamerConfig::new(&root)).unwrap();
        let proposals = engine.build_proposals().unwrap();

        let mut out = Vec::new();
        engine.write_dry_run(&proposals, &mut out).unwrap();
        let listing = String::from_utf8(out).unwrap();
        assert!(listing.contains("test_alpha.py | test_alpha_0001.py"));
        assert!(listing.contains("Proposals: 2"));

        let report = engine.apply(&proposals, false).unwrap();
        assert_eq!(report.renamed.len(), 2);
        assert!(root.join("test_alpha_0001.py").exists());
        assert!(root.join("test_alpha_0002.py").exists());

        // Second run is a no-op.
        let again = engine.build_proposals().unwrap();
        assert!(again.iter().all(Proposal::is_noop));
        assert_eq!(engine.apply(&again, false).unwrap().unchanged, 2);
    }
}
