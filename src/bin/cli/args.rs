//! CLI Argument Structures
//!
//! Flag definitions for the `test-namer` binary and their conversion into a
//! [`NamerConfig`].

use clap::Parser;
use std::path::PathBuf;

use test_namer_rs::NamerConfig;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Rename test modules based on sentinel metadata
#[derive(Parser, Debug)]
#[command(name = "test-namer")]
#[command(version = VERSION)]
#[command(about = "Rename test modules based on <sentinel> metadata")]
#[command(long_about = "
Rename Python test modules so their file names encode the domains declared by
a module-level sentinel list (DOMAINS by default). Runs as a dry run unless
--apply is given.

Common Usage:

  # Dry run
  test-namer --test-root tests

  # Follow imports under mypkg to collect sentinels from the code under test
  test-namer --test-root tests --import-root mypkg --repo-root .

  # Apply renames
  test-namer --test-root tests --apply

  # Apply and overwrite existing targets
  test-namer --test-root tests --apply --force
")]
pub struct Cli {
    /// Root tests directory to scan
    #[arg(long = "test-root", visible_alias = "root", default_value = "tests")]
    pub test_root: PathBuf,

    /// Module-level sentinel list to read
    #[arg(long, default_value = "DOMAINS")]
    pub sentinel: String,

    /// Root import prefix to follow from tests (dotted name)
    #[arg(long = "import-root", visible_alias = "root-import")]
    pub import_root: Option<String>,

    /// Repository root used to resolve imports
    #[arg(long = "repo-root")]
    pub repo_root: Option<PathBuf>,

    /// Directory names to skip; separate several with ';' or repeat the flag
    #[arg(long, value_delimiter = ';')]
    pub exclude: Vec<String>,

    /// Slug used for files without sentinels
    #[arg(long, default_value = "misc")]
    pub fallback: String,

    /// Leading token of every proposed name
    #[arg(long, default_value = "test")]
    pub prefix: String,

    /// Apply the renames (default is dry-run)
    #[arg(long)]
    pub apply: bool,

    /// Allow overwriting existing files during rename operations.
    ///
    /// Without it, a target that exists and is not renamed by the same batch
    /// aborts the run. With it, such targets are overwritten too, not only
    /// targets freed by other renames in the batch.
    #[arg(long)]
    pub force: bool,

    /// Enable verbose logging for debugging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Import root with an explicit empty value treated as absent
    pub fn import_root(&self) -> Option<&str> {
        self.import_root
            .as_deref()
            .map(str::trim)
            .filter(|root| !root.is_empty())
    }

    /// Build the engine configuration from the parsed flags
    pub fn to_config(&self) -> NamerConfig {
        let mut config = NamerConfig::new(&self.test_root)
            .with_sentinel(self.sentinel.as_str())
            .with_fallback(self.fallback.to_lowercase())
            .with_prefix(self.prefix.as_str())
            .with_excludes(
                self.exclude
                    .iter()
                    .map(|entry| entry.trim())
                    .filter(|entry| !entry.is_empty()),
            );

        config.import_root = self.import_root().map(str::to_string);
        config.repo_root = self.repo_root.clone();
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["test-namer"]);
        let config = cli.to_config();

        assert_eq!(config.test_root, PathBuf::from("tests"));
        assert_eq!(config.sentinel, "DOMAINS");
        assert_eq!(config.fallback, "misc");
        assert_eq!(config.prefix, "test");
        assert!(config.import_root.is_none());
        assert!(!cli.apply && !cli.force && !cli.verbose);
    }

    #[test]
    fn test_aliases_and_excludes() {
        let cli = Cli::parse_from([
            "test-namer",
            "--root",
            "t",
            "--root-import",
            "pkg.sub",
            "--exclude",
            "a; b;",
            "--exclude",
            "c",
            "--fallback",
            "General",
        ]);
        let config = cli.to_config();

        assert_eq!(config.test_root, PathBuf::from("t"));
        assert_eq!(config.import_root.as_deref(), Some("pkg.sub"));
        assert_eq!(config.excludes, vec!["a", "b", "c"]);
        assert_eq!(config.fallback, "general");
    }

    #[test]
    fn test_empty_import_root_is_absent() {
        let cli = Cli::parse_from(["test-namer", "--import-root", ""]);
        assert!(cli.import_root().is_none());
        assert!(cli.to_config().import_root.is_none());
    }
}
