//! Transitive sentinel aggregation through a test file's imports.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::debug;

use crate::core::errors::Result;
use crate::resolve::imports::ImportResolver;
use crate::resolve::module_locator::locate_with_member_fallback;
use crate::sentinel::extractor::SentinelExtractor;

/// Unions the sentinels of every module a test file imports
pub struct SentinelAggregator {
    resolver: ImportResolver,
    extractor: SentinelExtractor,
}

impl SentinelAggregator {
    /// Create an aggregator with its own resolver and extractor
    pub fn new() -> Result<Self> {
        Ok(Self {
            resolver: ImportResolver::new()?,
            extractor: SentinelExtractor::new()?,
        })
    }

    /// Sorted, de-duplicated sentinels reachable from `test_path`.
    ///
    /// Imports are resolved under `root_prefix` and located in `repo_root`.
    /// A dependency that cannot be read contributes nothing.
    pub fn aggregate(
        &mut self,
        test_path: &Path,
        root_prefix: &str,
        repo_root: &Path,
        sentinel: &str,
    ) -> Vec<String> {
        let imports = self
            .resolver
            .find_imports(test_path, root_prefix, Some(repo_root));

        let mut sentinels = BTreeSet::new();
        for module in &imports {
            for candidate in locate_with_member_fallback(module, repo_root) {
                match self.extractor.extract(&candidate, sentinel) {
                    Ok(values) => sentinels.extend(values),
                    Err(e) => debug!("ignoring sentinels of {}: {}", candidate.display(), e),
                }
            }
        }

        debug!(
            "{}: {} import(s), sentinels {:?}",
            test_path.display(),
            imports.len(),
            sentinels
        );
        sentinels.into_iter().collect()
    }
}
