//! Mapping dotted module names to source files under a repository root.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::core::config::is_identifier;
use crate::lang::python::{PACKAGE_INIT, SOURCE_EXTENSION};

/// Directory that `module_name` maps to under `repo_root`, without checking
/// that it exists. `None` when any part is not an identifier.
pub fn package_dir(module_name: &str, repo_root: &Path) -> Option<PathBuf> {
    let mut dir = repo_root.to_path_buf();
    for part in module_name.split('.') {
        if !is_identifier(part) {
            return None;
        }
        dir.push(part);
    }
    Some(dir)
}

/// Existing module file and package `__init__` for `module_name`, in that
/// order. Both are returned when a module and a package share a name.
pub fn strict_candidates(module_name: &str, repo_root: &Path) -> Vec<PathBuf> {
    let Some(base) = package_dir(module_name, repo_root) else {
        return Vec::new();
    };
    [base.with_extension(SOURCE_EXTENSION), base.join(PACKAGE_INIT)]
        .into_iter()
        .filter(|candidate| candidate.is_file())
        .collect()
}

/// Module file or package `__init__` for `module_name`, if either exists.
pub fn locate_strict(module_name: &str, repo_root: &Path) -> Option<PathBuf> {
    strict_candidates(module_name, repo_root).into_iter().next()
}

/// Whether `module_name` exists as a module file, a regular package or a
/// namespace package directory.
pub fn module_exists(module_name: &str, repo_root: &Path) -> bool {
    locate_strict(module_name, repo_root).is_some()
        || package_dir(module_name, repo_root).is_some_and(|dir| dir.is_dir())
}

/// Candidate source files for `module_name`.
///
/// Tries `<root>/a/b.py`, then `<root>/a/b/__init__.py`, then any file
/// named after the last dotted part anywhere under the root. The last step
/// can over-match when basenames repeat across packages.
pub fn locate(module_name: &str, repo_root: &Path) -> Vec<PathBuf> {
    let found = strict_candidates(module_name, repo_root);
    if !found.is_empty() {
        return found;
    }
    search_by_basename(module_name, repo_root)
}

/// Like [`locate`], but when nothing at all is found the name is retried as
/// its parent module, so `pkg.mod.Member` reaches `pkg/mod.py`.
pub fn locate_with_member_fallback(module_name: &str, repo_root: &Path) -> Vec<PathBuf> {
    let found = locate(module_name, repo_root);
    if !found.is_empty() {
        return found;
    }
    let Some((parent, _)) = module_name.rsplit_once('.') else {
        return found;
    };
    let found = strict_candidates(parent, repo_root);
    if !found.is_empty() {
        debug!("{} resolved through parent module {}", module_name, parent);
    }
    found
}

fn search_by_basename(module_name: &str, repo_root: &Path) -> Vec<PathBuf> {
    let Some(last) = module_name.rsplit('.').next().filter(|part| !part.is_empty()) else {
        return Vec::new();
    };
    let wanted = format!("{}.{}", last, SOURCE_EXTENSION);

    let matches: Vec<PathBuf> = WalkDir::new(repo_root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| !entry.file_type().is_dir())
        .filter(|entry| entry.file_name() == OsStr::new(&wanted))
        .map(|entry| entry.into_path())
        .collect();

    if matches.is_empty() {
        debug!("no source file found for {}", module_name);
    }
    matches
}
