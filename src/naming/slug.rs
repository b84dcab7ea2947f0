//! Slug rules for sentinel-derived file names.
//!
//! A slug only ever contains `[a-z0-9_]` (or `[A-Za-z0-9_]` when case is
//! preserved), never starts or ends with `_`, and never holds two `_` in a
//! row. Oversized single tokens are rejected; an oversized joined slug is
//! truncated.

use crate::core::config::NamerConfig;
use crate::core::errors::{NamerError, Result};

/// Normalise one raw token.
///
/// Characters outside the slug alphabet become `_`, runs of `_` collapse
/// and the result is trimmed of `_`. May return an empty string.
pub fn sanitize_token(raw: &str, lowercase: bool) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_underscore = false;

    for c in raw.trim().chars() {
        let c = if lowercase { c.to_ascii_lowercase() } else { c };
        if c.is_ascii_alphanumeric() {
            if pending_underscore && !out.is_empty() {
                out.push('_');
            }
            pending_underscore = false;
            out.push(c);
        } else {
            pending_underscore = true;
        }
    }

    out
}

/// Parameters that turn sentinel values into slugs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugRules {
    /// Lowercase tokens
    pub lowercase: bool,
    /// Upper bound for a token, the fallback, the prefix and the joined slug
    pub max_len: usize,
    /// Raw fallback token used when no sentinel survives sanitizing
    pub fallback: String,
}

impl SlugRules {
    /// Rules taken from a configuration
    pub fn from_config(config: &NamerConfig) -> Self {
        Self {
            lowercase: config.lowercase,
            max_len: config.max_slug_len,
            fallback: config.fallback.clone(),
        }
    }

    /// Slug for a list of sentinel values.
    ///
    /// Tokens are sanitized individually and joined with `_`. Empty tokens
    /// are dropped. With nothing left, the fallback is used.
    pub fn slugify<S: AsRef<str>>(&self, values: &[S]) -> Result<String> {
        let mut tokens = Vec::with_capacity(values.len());
        for value in values {
            let token = sanitize_token(value.as_ref(), self.lowercase);
            if token.is_empty() {
                continue;
            }
            if token.len() > self.max_len {
                return Err(NamerError::validation_field(
                    format!(
                        "Sentinel token too long ({} > {}): {:?}",
                        token.len(),
                        self.max_len,
                        value.as_ref()
                    ),
                    "sentinel",
                ));
            }
            tokens.push(token);
        }

        let joined = tokens.join("_");
        if joined.is_empty() {
            return self.fallback_slug();
        }
        if joined.len() <= self.max_len {
            return Ok(joined);
        }

        // Every character is ASCII, so byte truncation is safe.
        let truncated = joined[..self.max_len].trim_end_matches('_').to_string();
        if truncated.is_empty() {
            return self.fallback_slug();
        }
        Ok(truncated)
    }

    /// Sanitized fallback token.
    pub fn fallback_slug(&self) -> Result<String> {
        let fallback = sanitize_token(&self.fallback, false);
        if fallback.is_empty() {
            return Err(NamerError::validation_field(
                format!("Fallback token is empty after sanitizing: {:?}", self.fallback),
                "fallback",
            ));
        }
        if fallback.len() > self.max_len {
            return Err(NamerError::validation_field(
                format!("Fallback token too long ({} > {})", fallback.len(), self.max_len),
                "fallback",
            ));
        }
        Ok(fallback)
    }

    /// Group prefix `<prefix>_<slug>`.
    pub fn group_prefix(&self, prefix: &str, slug: &str) -> Result<String> {
        let prefix_token = sanitize_token(prefix, false);
        if prefix_token.is_empty() {
            return Err(NamerError::validation_field(
                format!("Prefix token is empty after sanitizing: {:?}", prefix),
                "prefix",
            ));
        }
        if prefix_token.len() > self.max_len {
            return Err(NamerError::validation_field(
                format!("Prefix token too long ({} > {})", prefix_token.len(), self.max_len),
                "prefix",
            ));
        }
        Ok(format!("{}_{}", prefix_token, slug))
    }
}
