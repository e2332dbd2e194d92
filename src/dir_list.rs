//! Non-recursive directory listing used by the scanner.
//!
//! Lists the immediate children of one directory, sorted by name, and
//! classifies each as something to fingerprint, something to descend into,
//! or something to ignore. Directory symlinks are never followed.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum DirListError {
    #[error("IO error: {0}")]
    Io(std::io::Error),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
}

impl DirListError {
    fn from_io(path: &Path, e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::PermissionDenied {
            DirListError::PermissionDenied(path.to_path_buf())
        } else {
            DirListError::Io(e)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file, or a symlink resolving to one.
    File,
    /// Real directory (not a symlink).
    Dir,
    /// Directory symlinks, broken symlinks, fifos, sockets, devices.
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: OsString,
    pub kind: EntryKind,
}

pub fn list_directory(dir: &Path) -> Result<Vec<DirEntry>, DirListError> {
    let read_dir = std::fs::read_dir(dir).map_err(|e| DirListError::from_io(dir, e))?;

    let mut entries = Vec::new();

    for entry in read_dir {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!("Skipping unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };
        let path = entry.path();

        let Some(kind) = classify_entry(&path) else {
            continue;
        };

        entries.push(DirEntry {
            name: entry.file_name(),
            kind,
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(entries)
}

/// Returns `None` when the entry cannot be inspected, typically because it was
/// removed after the directory was read.
fn classify_entry(path: &Path) -> Option<EntryKind> {
    let metadata = match std::fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("{} vanished during listing", path.display());
            return None;
        }
        Err(e) => {
            debug!("Skipping {}: {}", path.display(), e);
            return None;
        }
    };
    let file_type = metadata.file_type();

    let kind = if file_type.is_symlink() {
        match std::fs::metadata(path) {
            Ok(target) if target.is_file() => EntryKind::File,
            _ => EntryKind::Other,
        }
    } else if file_type.is_dir() {
        EntryKind::Dir
    } else if file_type.is_file() {
        EntryKind::File
    } else {
        EntryKind::Other
    };

    Some(kind)
}
