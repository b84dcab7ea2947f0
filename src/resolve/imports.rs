//! Static discovery of the modules a Python file references.
//!
//! The resolver walks the whole syntax tree, so imports inside functions,
//! conditionals and `try` blocks are found as well as module-level ones.
//! Only names inside the configured root prefix are reported.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::debug;
use tree_sitter::Node;

use crate::core::config::is_identifier;
use crate::core::errors::Result;
use crate::core::file_utils::FileReader;
use crate::lang::python::{
    dotted_name, node_text, preorder, PythonParser, PACKAGE_INIT_STEM, SOURCE_EXTENSION,
};
use crate::resolve::dynamic::{ConstantTable, DynamicImport};
use crate::resolve::module_locator::{module_exists, package_dir};

#[cfg(test)]
#[path = "imports_tests.rs"]
mod tests;

/// True when `name` is `prefix` itself or a dotted descendant of it.
///
/// An empty prefix admits every name.
pub fn is_under_prefix(name: &str, prefix: &str) -> bool {
    if prefix.is_empty() {
        return !name.is_empty();
    }
    match name.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('.'),
        None => false,
    }
}

/// Package parts of the module at `path`, relative to `repo_root`.
///
/// `repo/pkg/tests/test_x.py` yields `["pkg", "tests"]`. Paths outside the
/// root, or with components that are not valid UTF-8, yield `None`.
pub fn package_parts(path: &Path, repo_root: &Path) -> Option<Vec<String>> {
    let relative = relative_to(path, repo_root)?;
    let parent = relative.parent().unwrap_or_else(|| Path::new(""));

    parent
        .components()
        .map(|component| match component {
            Component::Normal(part) => part.to_str().map(str::to_string),
            _ => None,
        })
        .collect()
}

fn relative_to(path: &Path, repo_root: &Path) -> Option<PathBuf> {
    if let Ok(relative) = path.strip_prefix(repo_root) {
        return Some(relative.to_path_buf());
    }
    let path = path.canonicalize().ok()?;
    let repo_root = repo_root.canonicalize().ok()?;
    path.strip_prefix(&repo_root).ok().map(Path::to_path_buf)
}

/// Discovers prefixed module references in Python files
pub struct ImportResolver {
    parser: PythonParser,
}

impl ImportResolver {
    /// Create a resolver with its own parser
    pub fn new() -> Result<Self> {
        Ok(Self {
            parser: PythonParser::new()?,
        })
    }

    /// Module names under `root_prefix` that the file at `path` references.
    ///
    /// Unreadable files and files with syntax errors yield an empty set.
    /// Relative imports and wildcard expansion need `repo_root`.
    pub fn find_imports(
        &mut self,
        path: &Path,
        root_prefix: &str,
        repo_root: Option<&Path>,
    ) -> BTreeSet<String> {
        let source = match FileReader::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                debug!("skipping imports of {}: {}", path.display(), e);
                return BTreeSet::new();
            }
        };
        self.find_imports_in_source(&source, path, root_prefix, repo_root)
    }

    /// Same as [`find_imports`](Self::find_imports) for source already in
    /// memory; `path` locates the module for relative imports.
    pub fn find_imports_in_source(
        &mut self,
        source: &str,
        path: &Path,
        root_prefix: &str,
        repo_root: Option<&Path>,
    ) -> BTreeSet<String> {
        let tree = match self.parser.parse(source) {
            Ok(tree) => tree,
            Err(e) => {
                debug!("skipping imports of {}: {}", path.display(), e);
                return BTreeSet::new();
            }
        };
        let root = tree.root_node();
        if root.has_error() {
            debug!("skipping imports of {}: syntax error", path.display());
            return BTreeSet::new();
        }

        let package = repo_root.and_then(|repo_root| package_parts(path, repo_root));
        let mut collector = ImportCollector {
            source,
            root_prefix,
            repo_root,
            package,
            constants: ConstantTable::new(),
            found: BTreeSet::new(),
        };

        for node in preorder(root) {
            match node.kind() {
                "import_statement" => collector.import_statement(node),
                "import_from_statement" => collector.import_from_statement(node),
                "assignment" => collector.constants.observe(node, source),
                "call" => collector.dynamic_call(node),
                _ => {}
            }
        }

        debug!(
            "{} references {} module(s) under {:?}",
            path.display(),
            collector.found.len(),
            root_prefix
        );
        collector.found
    }
}

struct ImportCollector<'a> {
    source: &'a str,
    root_prefix: &'a str,
    repo_root: Option<&'a Path>,
    package: Option<Vec<String>>,
    constants: ConstantTable,
    found: BTreeSet<String>,
}

impl ImportCollector<'_> {
    fn record(&mut self, name: &str) {
        if is_under_prefix(name, self.root_prefix) {
            self.found.insert(name.to_string());
        }
    }

    /// `import a.b`, `import a.b as x`
    fn import_statement(&mut self, node: Node<'_>) {
        for name in self.imported_names(node) {
            self.record(&name);
        }
    }

    fn import_from_statement(&mut self, node: Node<'_>) {
        let Some(module) = node.child_by_field_name("module_name") else {
            return;
        };

        let (base, relative) = match module.kind() {
            "relative_import" => match self.resolve_relative(module) {
                Some(base) => (base, true),
                None => {
                    debug!("relative import climbs above the repository root; skipped");
                    return;
                }
            },
            _ => match dotted_name(module, self.source) {
                Some(base) => (base, false),
                None => return,
            },
        };

        let mut cursor = node.walk();
        let is_wildcard = node
            .named_children(&mut cursor)
            .any(|child| child.kind() == "wildcard_import");
        if is_wildcard {
            self.expand_wildcard(&base);
            return;
        }

        if !base.is_empty() {
            self.record(&base);
        }

        let bare_relative = relative && !has_module_part(module);
        for name in self.imported_names(node) {
            let candidate = join_module(&base, &name);
            if bare_relative || self.exists_on_disk(&candidate) {
                self.record(&candidate);
            }
        }
    }

    fn dynamic_call(&mut self, node: Node<'_>) {
        let Some(import) = DynamicImport::from_call(node, self.source) else {
            return;
        };
        match import.module_name(&self.constants) {
            Some(name) => self.record(&name),
            None => debug!("dynamic {:?} call with non-constant argument skipped", import.callee),
        }
    }

    /// Dotted names bound by the `name` fields of an import statement.
    fn imported_names(&self, node: Node<'_>) -> Vec<String> {
        let mut cursor = node.walk();
        node.children_by_field_name("name", &mut cursor)
            .filter_map(|child| match child.kind() {
                "aliased_import" => child
                    .child_by_field_name("name")
                    .and_then(|name| dotted_name(name, self.source)),
                _ => dotted_name(child, self.source),
            })
            .collect()
    }

    /// Absolute base of a relative import. One dot is the current package;
    /// each further dot climbs one level.
    fn resolve_relative(&self, module: Node<'_>) -> Option<String> {
        let package = self.package.as_ref()?;

        let mut level = 0;
        let mut tail = None;
        let mut cursor = module.walk();
        for child in module.named_children(&mut cursor) {
            match child.kind() {
                "import_prefix" => level = node_text(child, self.source).matches('.').count(),
                "dotted_name" => tail = dotted_name(child, self.source),
                _ => {}
            }
        }

        let climb = level.checked_sub(1)?;
        let keep = package.len().checked_sub(climb)?;

        let mut parts: Vec<&str> = package[..keep].iter().map(String::as_str).collect();
        if let Some(tail) = tail.as_deref() {
            parts.extend(tail.split('.'));
        }
        Some(parts.join("."))
    }

    fn exists_on_disk(&self, module_name: &str) -> bool {
        self.repo_root
            .is_some_and(|repo_root| module_exists(module_name, repo_root))
    }

    /// `from base import *`: the base plus every sibling module file.
    fn expand_wildcard(&mut self, base: &str) {
        if !base.is_empty() {
            self.record(base);
        }
        let Some(dir) = self.repo_root.and_then(|repo_root| wildcard_dir(base, repo_root)) else {
            return;
        };
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("cannot expand wildcard import of {}: {}", base, e);
                return;
            }
        };

        for entry in entries.filter_map(|entry| entry.ok()) {
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(SOURCE_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if stem != PACKAGE_INIT_STEM && is_identifier(stem) {
                self.record(&join_module(base, stem));
            }
        }
    }
}

fn has_module_part(relative_import: Node<'_>) -> bool {
    let mut cursor = relative_import.walk();
    let found = relative_import
        .named_children(&mut cursor)
        .any(|child| child.kind() == "dotted_name");
    found
}

fn wildcard_dir(base: &str, repo_root: &Path) -> Option<PathBuf> {
    if base.is_empty() {
        return Some(repo_root.to_path_buf());
    }
    package_dir(base, repo_root).filter(|dir| dir.is_dir())
}

fn join_module(base: &str, name: &str) -> String {
    if base.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", base, name)
    }
}
