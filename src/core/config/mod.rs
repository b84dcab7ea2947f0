//! Configuration types for test-namer.
//!
//! [`NamerConfig`] carries everything the proposal builder needs. The CLI
//! fills it from flags; library callers use the `with_*` builders. Call
//! [`NamerConfig::validate`] before building proposals: it performs every
//! check that must fail before the filesystem is touched.

pub mod validation;

use std::path::{Path, PathBuf};

use crate::core::errors::{NamerError, Result};
use crate::naming::slug::sanitize_token;

pub use validation::{
    is_dotted_identifier, is_identifier, validate_directory, validate_dotted_identifier,
    validate_identifier, validate_positive_usize,
};

#[cfg(test)]
#[path = "tests.rs"]
mod tests;

/// Upper bound for a single path component on common filesystems.
pub const MAX_FILENAME_LEN: usize = 255;

/// Default bound for a sanitized slug or token.
pub const MAX_SLUG_LEN: usize = 64;

/// Settings for scanning, naming and sequencing test files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamerConfig {
    /// Directory scanned for test files
    pub test_root: PathBuf,

    /// Module-level list name holding the domain metadata
    pub sentinel: String,

    /// Dotted prefix that limits import following (aggregation mode)
    pub import_root: Option<String>,

    /// Filesystem root used to resolve imported modules (aggregation mode)
    pub repo_root: Option<PathBuf>,

    /// Directory names skipped during the scan, in addition to `helpers`
    pub excludes: Vec<String>,

    /// Slug used when a file yields no sentinels
    pub fallback: String,

    /// Leading token of every proposed file name
    pub prefix: String,

    /// Lowercase sentinel values while slugging
    pub lowercase: bool,

    /// Maximum length of a sanitized token or joined slug
    pub max_slug_len: usize,

    /// Maximum length of a proposed file name
    pub max_filename_len: usize,

    /// File name prefix that marks a file as a test module
    pub test_marker: String,
}

impl Default for NamerConfig {
    fn default() -> Self {
        Self {
            test_root: Self::default_test_root(),
            sentinel: Self::default_sentinel(),
            import_root: None,
            repo_root: None,
            excludes: Vec::new(),
            fallback: Self::default_fallback(),
            prefix: Self::default_prefix(),
            lowercase: true,
            max_slug_len: MAX_SLUG_LEN,
            max_filename_len: MAX_FILENAME_LEN,
            test_marker: Self::default_test_marker(),
        }
    }
}

/// Default value providers for [`NamerConfig`].
impl NamerConfig {
    fn default_test_root() -> PathBuf {
        PathBuf::from("tests")
    }

    fn default_sentinel() -> String {
        "DOMAINS".to_string()
    }

    fn default_fallback() -> String {
        "misc".to_string()
    }

    fn default_prefix() -> String {
        "test".to_string()
    }

    fn default_test_marker() -> String {
        "test_".to_string()
    }
}

impl NamerConfig {
    /// Configuration scanning `test_root` with every other value defaulted
    pub fn new(test_root: impl Into<PathBuf>) -> Self {
        Self {
            test_root: test_root.into(),
            ..Self::default()
        }
    }

    /// Set the sentinel name
    pub fn with_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.sentinel = sentinel.into();
        self
    }

    /// Enable aggregation through imports under `import_root`, resolved in `repo_root`
    pub fn with_aggregation(mut self, import_root: impl Into<String>, repo_root: impl Into<PathBuf>) -> Self {
        self.import_root = Some(import_root.into());
        self.repo_root = Some(repo_root.into());
        self
    }

    /// Set only the repository root
    pub fn with_repo_root(mut self, repo_root: impl Into<PathBuf>) -> Self {
        self.repo_root = Some(repo_root.into());
        self
    }

    /// Add directory names to skip
    pub fn with_excludes<I, S>(mut self, excludes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excludes.extend(excludes.into_iter().map(Into::into));
        self
    }

    /// Set the fallback token
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    /// Set the prefix token
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Keep the case of sentinel values instead of lowercasing them
    pub fn with_case_preserved(mut self) -> Self {
        self.lowercase = false;
        self
    }

    /// Tighten the proposed file name bound
    pub fn with_max_filename_len(mut self, max: usize) -> Self {
        self.max_filename_len = max;
        self
    }

    /// Set the slug bound
    pub fn with_max_slug_len(mut self, max: usize) -> Self {
        self.max_slug_len = max;
        self
    }

    /// The `(import_root, repo_root)` pair when both are configured
    pub fn aggregation(&self) -> Option<(&str, &Path)> {
        match (&self.import_root, &self.repo_root) {
            (Some(import_root), Some(repo_root)) => Some((import_root.as_str(), repo_root.as_path())),
            _ => None,
        }
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<()> {
        validate_directory(&self.test_root, "test_root")?;
        validate_identifier(&self.sentinel, "sentinel")?;

        if let Some(import_root) = &self.import_root {
            validate_dotted_identifier(import_root, "import_root")?;
        }
        if let Some(repo_root) = &self.repo_root {
            validate_directory(repo_root, "repo_root")?;
        }

        validate_identifier(&self.prefix, "prefix")?;

        let fallback = sanitize_token(&self.fallback, false);
        if fallback.is_empty() || fallback.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(NamerError::validation_field(
                format!("Invalid fallback token: {:?}", self.fallback),
                "fallback",
            ));
        }

        if self.excludes.iter().any(|e| e.trim().is_empty()) {
            return Err(NamerError::validation_field(
                "Exclude entries must not be empty",
                "excludes",
            ));
        }

        if self.test_marker.is_empty() {
            return Err(NamerError::validation_field("test_marker must not be empty", "test_marker"));
        }

        validate_positive_usize(self.max_slug_len, "max_slug_len")?;
        validate_positive_usize(self.max_filename_len, "max_filename_len")?;
        if self.max_filename_len > MAX_FILENAME_LEN {
            return Err(NamerError::validation_field(
                format!("max_filename_len must not exceed {}", MAX_FILENAME_LEN),
                "max_filename_len",
            ));
        }
        if self.max_slug_len > self.max_filename_len {
            return Err(NamerError::validation_field(
                "max_slug_len must not exceed max_filename_len",
                "max_slug_len",
            ));
        }

        Ok(())
    }
}
