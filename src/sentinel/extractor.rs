//! Module-level sentinel extraction.
//!
//! A sentinel is a list of strings assigned at module scope, e.g.
//! `DOMAINS = ["parser", "imports"]`. Two independent strategies are tried in
//! order: the syntax tree (top-level assignments only), then a line-oriented
//! regular expression that also sees indented assignments and survives
//! syntax errors.

use std::collections::HashSet;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use tree_sitter::Node;

use crate::core::errors::{NamerError, Result};
use crate::core::file_utils::FileReader;
use crate::lang::python::{named_children, node_text, string_constant, PythonParser};

static QUOTED_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"['"](.*?)['"]"#).expect("quoted item pattern is valid"));

/// Outcome of the syntax-tree strategy.
#[derive(Debug, PartialEq, Eq)]
enum TreeLookup {
    /// A top-level assignment to the sentinel exists; its string elements
    Assigned(Vec<String>),
    /// The tree is unusable or has no top-level assignment
    Missing,
}

/// Reads sentinel lists from Python modules
pub struct SentinelExtractor {
    parser: PythonParser,
}

impl SentinelExtractor {
    /// Create an extractor with its own parser
    pub fn new() -> Result<Self> {
        Ok(Self {
            parser: PythonParser::new()?,
        })
    }

    /// Sentinel values assigned to `sentinel` in the file at `path`.
    ///
    /// A missing sentinel yields an empty list. An unreadable file is an
    /// error.
    pub fn extract(&mut self, path: &Path, sentinel: &str) -> Result<Vec<String>> {
        let source = FileReader::read_to_string(path).map_err(|e| NamerError::sentinel_read(path, e))?;
        Ok(self.extract_from_source(&source, sentinel))
    }

    /// Sentinel values assigned to `sentinel` in `source`.
    pub fn extract_from_source(&mut self, source: &str, sentinel: &str) -> Vec<String> {
        let values = match self.lookup_in_tree(source, sentinel) {
            TreeLookup::Assigned(values) => values,
            TreeLookup::Missing => scan_text(source, sentinel),
        };
        dedup_preserving_order(values)
    }

    fn lookup_in_tree(&mut self, source: &str, sentinel: &str) -> TreeLookup {
        let tree = match self.parser.parse(source) {
            Ok(tree) => tree,
            Err(e) => {
                debug!("sentinel lookup falls back to text scan: {}", e);
                return TreeLookup::Missing;
            }
        };
        let root = tree.root_node();
        if root.has_error() {
            debug!("source has syntax errors; scanning text for {}", sentinel);
            return TreeLookup::Missing;
        }

        for statement in named_children(root) {
            if statement.kind() != "expression_statement" {
                continue;
            }
            for expression in named_children(statement) {
                if expression.kind() != "assignment" {
                    continue;
                }
                if let Some(value) = assigned_value(expression, source, sentinel) {
                    return TreeLookup::Assigned(list_elements(value, source));
                }
            }
        }

        TreeLookup::Missing
    }
}

/// Right-hand side of `assignment` when one of its targets is `name`.
///
/// Follows chained assignments (`A = B = [...]`) to the final value.
fn assigned_value<'t>(assignment: Node<'t>, source: &str, name: &str) -> Option<Node<'t>> {
    let mut targets_name = false;
    let mut current = assignment;
    loop {
        if let Some(left) = current.child_by_field_name("left") {
            targets_name |= left.kind() == "identifier" && node_text(left, source) == name;
        }
        let right = current.child_by_field_name("right")?;
        if right.kind() == "assignment" {
            current = right;
            continue;
        }
        return targets_name.then_some(right);
    }
}

/// String elements of a list or tuple literal; anything else yields nothing.
fn list_elements(value: Node<'_>, source: &str) -> Vec<String> {
    match value.kind() {
        "list" | "tuple" | "expression_list" => named_children(value)
            .into_iter()
            .filter_map(|element| string_constant(element, source))
            .collect(),
        _ => Vec::new(),
    }
}

/// Regex strategy: `name = [ ... ]`, optionally indented, items quoted.
fn scan_text(source: &str, sentinel: &str) -> Vec<String> {
    let pattern = format!(r"(?ms)^\s*{}\s*=\s*\[(.*?)\]", regex::escape(sentinel));
    let Ok(assignment) = Regex::new(&pattern) else {
        return Vec::new();
    };

    assignment
        .captures(source)
        .and_then(|captures| captures.get(1))
        .map(|body| {
            QUOTED_ITEM
                .captures_iter(body.as_str())
                .filter_map(|item| item.get(1))
                .map(|item| item.as_str().to_string())
                .collect()
        })
        .unwrap_or_default()
}

fn dedup_preserving_order(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}
