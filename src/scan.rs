//! Recursive scan of a directory tree into a [`FingerprintSet`].
//!
//! Keys are paths relative to the canonicalized root, components joined with
//! `/`, so a baseline taken from one working directory lines up with a check
//! run from another. Each component goes through [`encode_name`], which keeps
//! distinct file names distinct even when they are not valid UTF-8.

use crate::checksum::checksum_file;
use crate::dir_list::{DirEntry, DirListError, EntryKind, list_directory};
use crate::fingerprint::FingerprintSet;
use std::ffi::OsStr;
use std::fmt::Write as _;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Directory does not exist: {0}")]
    RootNotFound(PathBuf),
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("IO error: {0}")]
    Io(std::io::Error),
}

impl From<DirListError> for ScanError {
    fn from(e: DirListError) -> Self {
        match e {
            DirListError::Io(e) => ScanError::Io(e),
            DirListError::PermissionDenied(path) => ScanError::PermissionDenied(path),
        }
    }
}

/// Fingerprints every regular file reachable from `root`.
///
/// Anything at or below `excluded` is skipped. `excluded` must be an
/// absolute path with its parent canonicalized (see
/// [`crate::baseline::BaselineStore::resolved_path`]) to compare correctly
/// against the canonicalized root.
///
/// Files that cannot be fingerprinted (vanished, permission denied, other
/// I/O errors) and subdirectories that cannot be listed are left out of the
/// result. Only failure to access `root` itself is an error.
pub fn scan(root: &Path, excluded: &Path) -> Result<FingerprintSet, ScanError> {
    let root = root.canonicalize().map_err(|e| match e.kind() {
        ErrorKind::NotFound => ScanError::RootNotFound(root.to_path_buf()),
        ErrorKind::PermissionDenied => ScanError::PermissionDenied(root.to_path_buf()),
        _ => ScanError::Io(e),
    })?;

    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root));
    }

    let entries = list_directory(&root)?;

    let mut fingerprints = FingerprintSet::new();
    walk_entries(&root, "", entries, excluded, &mut fingerprints);

    debug!(
        "Scanned {}: {} files fingerprinted",
        root.display(),
        fingerprints.len()
    );

    Ok(fingerprints)
}

fn walk_entries(
    dir: &Path,
    prefix: &str,
    entries: Vec<DirEntry>,
    excluded: &Path,
    fingerprints: &mut FingerprintSet,
) {
    for entry in entries {
        let path = dir.join(&entry.name);

        if path.starts_with(excluded) {
            debug!("Excluding {}", path.display());
            continue;
        }

        let name = encode_name(&entry.name);
        let key = if prefix.is_empty() {
            name
        } else {
            format!("{prefix}/{name}")
        };

        match entry.kind {
            EntryKind::Dir => match list_directory(&path) {
                Ok(children) => walk_entries(&path, &key, children, excluded, fingerprints),
                Err(e) => debug!("Skipping directory {}: {}", path.display(), e),
            },
            EntryKind::File => match checksum_file(&path) {
                Ok(fingerprint) => {
                    if fingerprints.insert(key.clone(), fingerprint).is_some() {
                        warn!("Two files map to the key {key}, keeping {}", path.display());
                    }
                }
                Err(e) => debug!("Skipping file {}: {}", path.display(), e),
            },
            EntryKind::Other => debug!("Ignoring {}", path.display()),
        }
    }
}

/// Turns one path component into a key segment.
///
/// Valid UTF-8 passes through, except that `\` is doubled. Bytes that are not
/// valid UTF-8 become `\xNN`. The doubling keeps the two forms apart, so two
/// different names never share a key.
#[cfg(unix)]
fn encode_name(name: &OsStr) -> String {
    use std::os::unix::ffi::OsStrExt;

    let mut encoded = String::with_capacity(name.len());
    for chunk in name.as_bytes().utf8_chunks() {
        encoded.push_str(&chunk.valid().replace('\\', "\\\\"));
        for byte in chunk.invalid() {
            let _ = write!(encoded, "\\x{byte:02x}");
        }
    }
    encoded
}

/// Turns one path component into a key segment.
///
/// Unpaired surrogates become `\u{XXXX}` and `\` is doubled.
#[cfg(windows)]
fn encode_name(name: &OsStr) -> String {
    use std::os::windows::ffi::OsStrExt;

    let mut encoded = String::with_capacity(name.len());
    for unit in char::decode_utf16(name.encode_wide()) {
        match unit {
            Ok('\\') => encoded.push_str("\\\\"),
            Ok(c) => encoded.push(c),
            Err(e) => {
                let _ = write!(encoded, "\\u{{{:04x}}}", e.unpaired_surrogate());
            }
        }
    }
    encoded
}
