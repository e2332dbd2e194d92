use crate::fingerprint::FileFingerprint;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Read buffer size. Memory use per file is bounded by this regardless of
/// file size.
const CHUNK_SIZE: usize = 8192;

#[derive(Debug, thiserror::Error)]
pub enum ChecksumError {
    #[error("IO error: {0}")]
    Io(std::io::Error),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("File not found: {0}")]
    NotFound(PathBuf),
}

impl ChecksumError {
    fn from_io(path: &Path, e: std::io::Error) -> Self {
        match e.kind() {
            ErrorKind::PermissionDenied => ChecksumError::PermissionDenied(path.to_path_buf()),
            ErrorKind::NotFound => ChecksumError::NotFound(path.to_path_buf()),
            _ => ChecksumError::Io(e),
        }
    }
}

/// Computes the SHA-256 fingerprint of a file's content.
///
/// The file is streamed through the hasher in fixed-size chunks, so
/// arbitrarily large files are handled in constant memory. Only content is
/// hashed; mtime, size and permissions play no part.
///
/// # Errors
/// - `ChecksumError::NotFound`: the file vanished before it could be opened
/// - `ChecksumError::PermissionDenied`: insufficient permissions to read it
/// - `ChecksumError::Io`: any other I/O failure while opening or reading
pub fn checksum_file(path: &Path) -> Result<FileFingerprint, ChecksumError> {
    let mut file = File::open(path).map_err(|e| ChecksumError::from_io(path, e))?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; CHUNK_SIZE];

    loop {
        let bytes_read = match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(ChecksumError::from_io(path, e)),
        };
        hasher.update(&buffer[..bytes_read]);
    }

    let sha256 = format!("{:x}", hasher.finalize());

    debug!("Checksum of {} is {}", path.display(), sha256);

    Ok(FileFingerprint::from_hex(sha256))
}
