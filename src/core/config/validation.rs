//! Validation helper functions for configuration values.

use std::path::Path;

use crate::core::errors::{NamerError, Result};

/// Validate that a usize value is greater than zero.
pub fn validate_positive_usize(value: usize, field: &str) -> Result<()> {
    if value == 0 {
        return Err(NamerError::validation_field(
            format!("{} must be greater than 0", field),
            field,
        ));
    }
    Ok(())
}

/// True when `name` starts with a letter or underscore and continues with
/// letters, digits or underscores.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// True for dotted package paths such as `pkg` or `pkg.sub.module`.
pub fn is_dotted_identifier(name: &str) -> bool {
    !name.is_empty() && name.split('.').all(is_identifier)
}

/// Validate that `value` is an identifier.
pub fn validate_identifier(value: &str, field: &str) -> Result<()> {
    if !is_identifier(value) {
        return Err(NamerError::validation_field(
            format!("Invalid {} name: {:?}", field, value),
            field,
        ));
    }
    Ok(())
}

/// Validate that `value` is a dotted identifier.
pub fn validate_dotted_identifier(value: &str, field: &str) -> Result<()> {
    if !is_dotted_identifier(value) {
        return Err(NamerError::validation_field(
            format!("Invalid {} format: {:?}", field, value),
            field,
        ));
    }
    Ok(())
}

/// Validate that `path` exists and is a directory.
pub fn validate_directory(path: &Path, field: &str) -> Result<()> {
    if !path.is_dir() {
        return Err(NamerError::validation_field(
            format!("{} not found or not a directory: {}", field, path.display()),
            field,
        ));
    }
    Ok(())
}
