//! File utilities for safe and robust file operations.
//!
//! Reading tolerates non-UTF-8 content, renaming refuses silent overwrites,
//! and volume detection keeps renames on a single device.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf, Prefix};

use tracing::{debug, warn};

use crate::core::errors::{NamerError, Result};

/// Safe file reading with UTF-8 validation and fallback handling
pub struct FileReader;

impl FileReader {
    /// Read a file to string, handling non-UTF-8 files gracefully
    pub fn read_to_string(file_path: &Path) -> Result<String> {
        match fs::read_to_string(file_path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                let bytes = fs::read(file_path).map_err(|err| NamerError::read(file_path, err))?;
                warn!(
                    "File contained invalid UTF-8, converted with lossy encoding: {}",
                    file_path.display()
                );
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
            Err(e) => {
                debug!("read failed for {}: {}", file_path.display(), e);
                Err(NamerError::read(file_path, e))
            }
        }
    }
}

/// Guarded single-file renames
pub struct FileRenamer;

impl FileRenamer {
    /// Move `src` to `dst`.
    ///
    /// Fails when `src` is missing, when `dst` exists and `overwrite` is
    /// false, or when the destination parent exists but is not a directory.
    /// Missing parent directories are created. The move itself is a single
    /// `rename(2)`, so it is atomic on one filesystem.
    pub fn rename(src: &Path, dst: &Path, overwrite: bool) -> Result<()> {
        if !src.exists() {
            return Err(NamerError::rename(src, dst, "source does not exist"));
        }
        if dst.exists() && !overwrite {
            return Err(NamerError::rename(
                src,
                dst,
                "destination exists and overwrite is disabled",
            ));
        }

        if let Some(parent) = dst.parent().filter(|p| !p.as_os_str().is_empty()) {
            if parent.exists() && !parent.is_dir() {
                return Err(NamerError::rename(
                    src,
                    dst,
                    format!("destination parent is not a directory: {}", parent.display()),
                ));
            }
            fs::create_dir_all(parent).map_err(|e| {
                NamerError::rename_io(src, dst, "could not create destination directory", e)
            })?;
        }

        fs::rename(src, dst).map_err(|e| {
            debug!("rename failed {} -> {}: {}", src.display(), dst.display(), e);
            NamerError::rename_io(src, dst, "rename failed", e)
        })
    }
}

/// Closest ancestor of `path` (or `path` itself) that exists on disk.
pub fn nearest_existing_ancestor(path: &Path) -> Option<PathBuf> {
    let mut current = Some(path);
    while let Some(candidate) = current {
        let existing = if candidate.as_os_str().is_empty() {
            Path::new(".")
        } else {
            candidate
        };
        if existing.exists() {
            return Some(existing.to_path_buf());
        }
        current = candidate.parent();
    }
    None
}

/// Whether `a` and `b` live on the same volume.
///
/// Paths with differing drive prefixes are never on the same volume. On Unix
/// the device ids of the nearest existing ancestors are compared; when
/// neither side can be inspected the paths are assumed to share a volume.
pub fn same_volume(a: &Path, b: &Path) -> bool {
    same_volume_by(a, b, device_id)
}

/// [`same_volume`] with a caller-supplied device lookup.
pub fn same_volume_by<F>(a: &Path, b: &Path, device_of: F) -> bool
where
    F: Fn(&Path) -> Option<u64>,
{
    if drive_prefix(a) != drive_prefix(b) {
        return false;
    }
    match (device_of(a), device_of(b)) {
        (Some(left), Some(right)) => left == right,
        _ => true,
    }
}

fn drive_prefix(path: &Path) -> Option<String> {
    match path.components().next() {
        Some(Component::Prefix(prefix)) => Some(match prefix.kind() {
            Prefix::Disk(letter) | Prefix::VerbatimDisk(letter) => {
                (letter as char).to_ascii_uppercase().to_string()
            }
            _ => prefix.as_os_str().to_string_lossy().to_ascii_uppercase(),
        }),
        _ => None,
    }
}

#[cfg(unix)]
fn device_id(path: &Path) -> Option<u64> {
    use std::os::unix::fs::MetadataExt;

    let existing = nearest_existing_ancestor(path)?;
    fs::metadata(existing).ok().map(|meta| meta.dev())
}

#[cfg(not(unix))]
fn device_id(_path: &Path) -> Option<u64> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_to_string_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.py");
        let err = FileReader::read_to_string(&missing).unwrap_err();
        assert!(matches!(err, NamerError::Read { .. }));
    }

    #[test]
    fn test_read_to_string_lossy_for_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("latin1.py");
        fs::write(&file, b"DOMAINS = ['caf\xe9']\n").unwrap();
        let content = FileReader::read_to_string(&file).unwrap();
        assert!(content.starts_with("DOMAINS = ['caf"));
    }

    #[test]
    fn test_rename_creates_missing_parent() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("a.txt");
        let dst = dir.path().join("b").join("b.txt");
        fs::write(&src, "data").unwrap();

        FileRenamer::rename(&src, &dst, false).unwrap();
        assert!(!src.exists());
        assert_eq!(fs::read_to_string(&dst).unwrap(), "data");
    }

    #[test]
    fn test_rename_missing_source_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileRenamer::rename(&dir.path().join("nope"), &dir.path().join("x"), false).unwrap_err();
        assert!(err.to_string().contains("source does not exist"));
    }

    #[test]
    fn test_rename_respects_overwrite_flag() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.txt");
        let dst = dir.path().join("dst.txt");
        fs::write(&src, "new").unwrap();
        fs::write(&dst, "old").unwrap();

        assert!(FileRenamer::rename(&src, &dst, false).is_err());
        assert_eq!(fs::read_to_string(&dst).unwrap(), "old");

        FileRenamer::rename(&src, &dst, true).unwrap();
        assert_eq!(fs::read_to_string(&dst).unwrap(), "new");
    }

    #[test]
    fn test_rename_rejects_file_as_parent() {
        let dir = tempfile::tempdir().unwrap();
        let parent_file = dir.path().join("parentf");
        let src = dir.path().join("src.txt");
        fs::write(&parent_file, "x").unwrap();
        fs::write(&src, "1").unwrap();

        let err = FileRenamer::rename(&src, &parent_file.join("child.txt"), false).unwrap_err();
        assert!(err.to_string().contains("not a directory"));
        assert!(src.exists());
    }

    #[test]
    fn test_nearest_existing_ancestor() {
        let dir = tempfile::tempdir().unwrap();
        let deep = dir.path().join("a").join("b").join("c.py");
        assert_eq!(nearest_existing_ancestor(&deep), Some(dir.path().to_path_buf()));
    }

    #[test]
    fn test_same_volume_within_one_directory() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.py");
        fs::write(&a, "").unwrap();
        assert!(same_volume(&a, &dir.path().join("sub").join("b.py")));
    }

    #[test]
    fn test_same_volume_compares_device_ids() {
        let device_of = |path: &Path| Some(if path.starts_with("/mnt") { 2 } else { 1 });

        assert!(same_volume_by(Path::new("/srv/a.py"), Path::new("/srv/b.py"), device_of));
        assert!(!same_volume_by(Path::new("/srv/a.py"), Path::new("/mnt/b.py"), device_of));
        // Unknown devices are assumed to match.
        assert!(same_volume_by(Path::new("/srv/a.py"), Path::new("/mnt/b.py"), |_| None));
    }

    #[cfg(windows)]
    #[test]
    fn test_different_drives_are_different_volumes() {
        assert!(!same_volume(Path::new(r"C:\tests\a.py"), Path::new(r"D:\tests\a.py")));
        assert!(!same_volume_by(Path::new(r"C:\a.py"), Path::new(r"D:\a.py"), |_| Some(1)));
    }
}
