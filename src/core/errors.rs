//! Error types for the test-namer library.
//!
//! Every failure the engine can surface is expressed through [`NamerError`].
//! Lower-level causes (I/O, directory traversal, nested extraction failures)
//! are kept as `#[source]` so callers can print the full chain.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Main result type for test-namer operations.
pub type Result<T> = std::result::Result<T, NamerError>;

/// Error family for sentinel extraction, proposal building and renaming.
#[derive(Error, Debug)]
pub enum NamerError {
    /// Generic I/O failure that is not tied to a single read or rename
    #[error("I/O error: {message}")]
    Io {
        /// Human-readable error message
        message: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A file could not be read
    #[error("Failed to read file: {}", path.display())]
    Read {
        /// File that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Sentinel extraction failed on a file the caller asked about directly
    #[error("Failed to extract sentinels from {}", path.display())]
    SentinelRead {
        /// File whose sentinels were requested
        path: PathBuf,
        /// What went wrong underneath
        #[source]
        source: Box<NamerError>,
    },

    /// A rename (or the directory preparation for it) failed
    #[error("Failed to rename {} to {}: {message}", from.display(), to.display())]
    Rename {
        /// Origin path
        from: PathBuf,
        /// Destination path
        to: PathBuf,
        /// Error description
        message: String,
        /// Underlying I/O error, if any
        #[source]
        source: Option<io::Error>,
    },

    /// Directory traversal failed while scanning for test files
    #[error("Failed to scan {}: {message}", root.display())]
    Scan {
        /// Root of the traversal
        root: PathBuf,
        /// Error description
        message: String,
        /// Underlying traversal error
        #[source]
        source: Option<walkdir::Error>,
    },

    /// Validation errors for input data
    #[error("Validation error: {message}")]
    Validation {
        /// Error description
        message: String,
        /// Field or input that failed validation
        field: Option<String>,
    },

    /// A destination already exists and is not being moved away by the batch
    #[error("Target exists and is not being renamed: {}", target.display())]
    Collision {
        /// Occupied destination
        target: PathBuf,
    },

    /// Parser setup or parsing failed
    #[error("Parse error in {language}: {message}")]
    Parse {
        /// Language grammar in use
        language: String,
        /// Error description
        message: String,
    },

    /// Unsupported operation or feature
    #[error("Unsupported: {message}")]
    Unsupported {
        /// Error description
        message: String,
    },
}

impl NamerError {
    /// Create a new I/O error with context
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a read failure for `path`
    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Wrap a lower-level failure as a sentinel extraction failure
    pub fn sentinel_read(path: impl Into<PathBuf>, source: NamerError) -> Self {
        Self::SentinelRead {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// Create a rename failure without an underlying I/O cause
    pub fn rename(from: &Path, to: &Path, message: impl Into<String>) -> Self {
        Self::Rename {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a rename failure caused by an I/O error
    pub fn rename_io(from: &Path, to: &Path, message: impl Into<String>, source: io::Error) -> Self {
        Self::Rename {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a scan failure from a traversal error
    pub fn scan(root: &Path, source: walkdir::Error) -> Self {
        Self::Scan {
            root: root.to_path_buf(),
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Create a new validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Create a new validation error with field context
    pub fn validation_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a collision error for an occupied destination
    pub fn collision(target: impl Into<PathBuf>) -> Self {
        Self::Collision {
            target: target.into(),
        }
    }

    /// Create a new parse error
    pub fn parse(language: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            language: language.into(),
            message: message.into(),
        }
    }

    /// Create a new unsupported error
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported {
            message: message.into(),
        }
    }

    /// True for failures detected before any filesystem mutation
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_sentinel_read_keeps_cause() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "gone");
        let err = NamerError::sentinel_read("tests/test_a.py", NamerError::read("tests/test_a.py", io_err));

        assert!(err.to_string().contains("tests/test_a.py"));
        let source = err.source().expect("sentinel read should expose its cause");
        assert!(source.to_string().starts_with("Failed to read file"));
    }

    #[test]
    fn test_validation_field_error() {
        let err = NamerError::validation_field("Invalid sentinel name: 1BAD", "sentinel");

        if let NamerError::Validation { message, field } = &err {
            assert_eq!(message, "Invalid sentinel name: 1BAD");
            assert_eq!(field.as_deref(), Some("sentinel"));
        } else {
            panic!("Expected Validation error");
        }
        assert!(err.is_validation());
    }

    #[test]
    fn test_collision_message_names_target() {
        let err = NamerError::collision("tests/test_misc_0001.py");
        assert_eq!(
            err.to_string(),
            "Target exists and is not being renamed: tests/test_misc_0001.py"
        );
        assert!(!err.is_validation());
    }

    #[test]
    fn test_rename_io_error_display() {
        let err = NamerError::rename_io(
            Path::new("a.py"),
            Path::new("b.py"),
            "rename failed",
            io::Error::new(io::ErrorKind::Other, "boom"),
        );
        assert_eq!(err.to_string(), "Failed to rename a.py to b.py: rename failed");
        assert!(err.source().is_some());
    }
}
