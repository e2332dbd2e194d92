use crate::fingerprint::FingerprintSet;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Location of the baseline artifact relative to the working directory.
pub const DEFAULT_BASELINE_FILENAME: &str = "sentinel_baseline.toml";

#[derive(Debug, thiserror::Error)]
pub enum BaselineError {
    #[error("No baseline found at {0}")]
    Missing(PathBuf),
    #[error("Baseline {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Baseline {path} has unsupported version {version}")]
    UnsupportedVersion { path: PathBuf, version: u32 },
    #[error("IO error: {0}")]
    Io(std::io::Error),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

#[derive(Debug)]
enum ParseError {
    Toml(toml::de::Error),
    UnsupportedVersion(u32),
}

impl ParseError {
    fn at(self, path: &Path) -> BaselineError {
        match self {
            ParseError::Toml(source) => BaselineError::Corrupt {
                path: path.to_path_buf(),
                source,
            },
            ParseError::UnsupportedVersion(version) => BaselineError::UnsupportedVersion {
                path: path.to_path_buf(),
                version,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct Metadata {
    version: u32,
    /// RFC 3339, UTC.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<String>,
}

/// Only the metadata section, ignoring the rest so that the version can be
/// checked before a full (strict) parse.
#[derive(Debug, Deserialize)]
struct MetadataOnly {
    metadata: Metadata,
}

/// On-disk form of a baseline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BaselineFile {
    metadata: Metadata,
    #[serde(default)]
    files: FingerprintSet,
}

impl BaselineFile {
    const SUPPORTED_VERSION: u32 = 1;

    /// Create a baseline stamped with the current time.
    pub fn new(files: FingerprintSet) -> Self {
        let created_at = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        BaselineFile {
            metadata: Metadata {
                version: Self::SUPPORTED_VERSION,
                created_at: Some(created_at),
            },
            files,
        }
    }

    pub fn fingerprints(&self) -> &FingerprintSet {
        &self.files
    }

    /// Creation time rendered in the local timezone, if recorded and valid.
    pub fn created_at_local(&self) -> Option<String> {
        let raw = self.metadata.created_at.as_deref()?;
        let parsed = chrono::DateTime::parse_from_rfc3339(raw).ok()?;
        let local: chrono::DateTime<chrono::Local> = parsed.into();
        Some(local.format("%Y-%m-%d %H:%M:%S").to_string())
    }

    fn from_toml(content: &str) -> Result<Self, ParseError> {
        let metadata_only: MetadataOnly = toml::from_str(content).map_err(ParseError::Toml)?;

        if metadata_only.metadata.version != Self::SUPPORTED_VERSION {
            return Err(ParseError::UnsupportedVersion(
                metadata_only.metadata.version,
            ));
        }

        toml::from_str(content).map_err(ParseError::Toml)
    }

    fn to_toml(&self) -> Result<String, BaselineError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Reads and writes the baseline artifact at one configured location.
#[derive(Debug, Clone)]
pub struct BaselineStore {
    path: PathBuf,
}

impl BaselineStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        BaselineStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Absolute location of the artifact, with the parent directory
    /// canonicalized when it exists. This is the form the scanner compares
    /// against, since it walks a canonicalized root.
    pub fn resolved_path(&self) -> Result<PathBuf, BaselineError> {
        let absolute = std::path::absolute(&self.path).map_err(BaselineError::Io)?;

        let resolved = match (absolute.parent(), absolute.file_name()) {
            (Some(parent), Some(name)) => match parent.canonicalize() {
                Ok(parent) => parent.join(name),
                Err(_) => absolute,
            },
            _ => absolute,
        };

        Ok(resolved)
    }

    /// Load the full artifact, including its metadata.
    pub fn load(&self) -> Result<BaselineFile, BaselineError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => BaselineError::Missing(self.path.clone()),
            ErrorKind::PermissionDenied => BaselineError::PermissionDenied(self.path.clone()),
            _ => BaselineError::Io(e),
        })?;

        BaselineFile::from_toml(&content).map_err(|e| e.at(&self.path))
    }

    /// Record `fingerprints` as the new baseline, replacing any existing one.
    pub fn save(&self, fingerprints: &FingerprintSet) -> Result<(), BaselineError> {
        self.save_file(&BaselineFile::new(fingerprints.clone()))
    }

    /// Write the artifact atomically.
    ///
    /// Writes to a temporary file, fsyncs it, then atomically renames it into place.
    pub fn save_file(&self, baseline: &BaselineFile) -> Result<(), BaselineError> {
        use std::io::Write;

        let content = baseline.to_toml()?;

        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let mut temp_file = tempfile::NamedTempFile::new_in(parent).map_err(|e| {
            if e.kind() == ErrorKind::PermissionDenied {
                BaselineError::PermissionDenied(parent.to_path_buf())
            } else {
                BaselineError::Io(e)
            }
        })?;

        temp_file
            .write_all(content.as_bytes())
            .map_err(BaselineError::Io)?;

        temp_file.as_file().sync_all().map_err(BaselineError::Io)?;

        temp_file.persist(&self.path).map_err(|e| {
            if e.error.kind() == ErrorKind::PermissionDenied {
                BaselineError::PermissionDenied(self.path.clone())
            } else {
                BaselineError::Io(e.error)
            }
        })?;

        Ok(())
    }
}
