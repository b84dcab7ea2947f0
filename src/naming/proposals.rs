//! Building rename proposals from sentinel metadata.
//!
//! Eligible test files are grouped by their `<prefix>_<slug>` and numbered
//! within each group. The result depends only on the file set and file
//! contents, so repeated runs produce identical proposals.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

use crate::core::config::NamerConfig;
use crate::core::errors::{NamerError, Result};
use crate::lang::python::SOURCE_EXTENSION;
use crate::naming::slug::SlugRules;
use crate::resolve::aggregate::SentinelAggregator;
use crate::sentinel::extractor::SentinelExtractor;

#[cfg(test)]
#[path = "proposals_tests.rs"]
mod tests;

/// Directory name that is never scanned, compared case-insensitively.
pub const HELPERS_DIR: &str = "helpers";

/// A planned move of one file to a new name in the same directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Proposal {
    original: PathBuf,
    proposed: PathBuf,
}

impl Proposal {
    /// Pair an original path with its proposed path
    pub fn new(original: impl Into<PathBuf>, proposed: impl Into<PathBuf>) -> Self {
        Self {
            original: original.into(),
            proposed: proposed.into(),
        }
    }

    /// Current location
    pub fn original(&self) -> &Path {
        &self.original
    }

    /// Planned location
    pub fn proposed(&self) -> &Path {
        &self.proposed
    }

    /// File name component of the proposed path
    pub fn proposed_name(&self) -> String {
        self.proposed
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// The file already carries its proposed name
    pub fn is_noop(&self) -> bool {
        self.original == self.proposed
    }
}

impl TryFrom<Vec<PathBuf>> for Proposal {
    type Error = NamerError;

    fn try_from(paths: Vec<PathBuf>) -> Result<Self> {
        match <[PathBuf; 2]>::try_from(paths) {
            Ok([original, proposed]) => Ok(Self::new(original, proposed)),
            Err(paths) => Err(NamerError::validation_field(
                format!("Malformed proposal: expected 2 paths, got {}", paths.len()),
                "proposal",
            )),
        }
    }
}

impl From<(PathBuf, PathBuf)> for Proposal {
    fn from((original, proposed): (PathBuf, PathBuf)) -> Self {
        Self::new(original, proposed)
    }
}

/// Scans a test tree and plans sequenced names
pub struct ProposalBuilder<'c> {
    config: &'c NamerConfig,
    rules: SlugRules,
    extractor: SentinelExtractor,
    aggregator: Option<SentinelAggregator>,
}

impl<'c> ProposalBuilder<'c> {
    /// Validate `config` and prepare the parsers it needs
    pub fn new(config: &'c NamerConfig) -> Result<Self> {
        config.validate()?;
        let aggregator = match config.aggregation() {
            Some(_) => Some(SentinelAggregator::new()?),
            None => None,
        };
        Ok(Self {
            config,
            rules: SlugRules::from_config(config),
            extractor: SentinelExtractor::new()?,
            aggregator,
        })
    }

    /// Plan a new name for every eligible test file.
    ///
    /// Fails without returning anything when any file would get an invalid
    /// name.
    pub fn build(&mut self) -> Result<Vec<Proposal>> {
        let files = self.collect_test_files()?;
        debug!("{} eligible test file(s) under {}", files.len(), self.config.test_root.display());

        let mut groups: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
        for file in files {
            let sentinels = self.sentinels_for(&file)?;
            let slug = self.rules.slugify(&sentinels)?;
            let group = self.rules.group_prefix(&self.config.prefix, &slug)?;
            debug!("{} -> {} {:?}", file.display(), group, sentinels);
            groups.entry(group).or_default().push(file);
        }

        let mut proposals = Vec::new();
        for (group, mut members) in groups {
            members.sort_by_cached_key(|path| (path.to_string_lossy().to_lowercase(), path.clone()));
            for (index, original) in members.into_iter().enumerate() {
                let name = format!("{}_{:04}.{}", group, index + 1, SOURCE_EXTENSION);
                if name.len() > self.config.max_filename_len {
                    return Err(NamerError::validation_field(
                        format!(
                            "Proposed file name too long ({} > {}): {}",
                            name.len(),
                            self.config.max_filename_len,
                            name
                        ),
                        "max_filename_len",
                    ));
                }
                let proposed = original.with_file_name(name);
                proposals.push(Proposal::new(original, proposed));
            }
        }

        info!("Built {} proposal(s)", proposals.len());
        Ok(proposals)
    }

    /// Eligible test files in walk order.
    ///
    /// Directories named `helpers` (any case) or listed in the excludes are
    /// pruned. Only files starting with the test marker and carrying the
    /// Python extension are kept.
    pub fn collect_test_files(&self) -> Result<Vec<PathBuf>> {
        let root = &self.config.test_root;
        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.is_excluded_dir(entry));

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| NamerError::scan(root, e))?;
            // Linked files count; linked directories are never entered.
            let file_type = entry.file_type();
            let is_file = file_type.is_file() || (file_type.is_symlink() && entry.path().is_file());
            if !is_file {
                continue;
            }
            if self.is_test_file(entry.path()) {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    fn is_excluded_dir(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return false;
        }
        let Some(name) = entry.file_name().to_str() else {
            return false;
        };
        let excluded = name.eq_ignore_ascii_case(HELPERS_DIR)
            || self.config.excludes.iter().any(|exclude| exclude == name);
        if excluded {
            debug!("skipping directory {}", entry.path().display());
        }
        excluded
    }

    fn is_test_file(&self, path: &Path) -> bool {
        let has_marker = path
            .file_name()
            .and_then(OsStr::to_str)
            .is_some_and(|name| name.starts_with(&self.config.test_marker));
        has_marker && path.extension() == Some(OsStr::new(SOURCE_EXTENSION))
    }

    fn sentinels_for(&mut self, file: &Path) -> Result<Vec<String>> {
        match (self.aggregator.as_mut(), self.config.aggregation()) {
            (Some(aggregator), Some((import_root, repo_root))) => {
                Ok(aggregator.aggregate(file, import_root, repo_root, &self.config.sentinel))
            }
            _ => self.extractor.extract(file, &self.config.sentinel),
        }
    }
}

/// Validate `config` and build its proposals in one call.
pub fn build_proposals(config: &NamerConfig) -> Result<Vec<Proposal>> {
    ProposalBuilder::new(config)?.build()
}
