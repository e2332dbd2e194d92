//! Value types for content fingerprints.
//!
//! A [`FingerprintSet`] is the complete observed state of a tree at one point
//! in time: normalized relative path to the SHA-256 of that file's content.
//! It is backed by a `BTreeMap` so iteration (and serialization) is always in
//! lexicographic path order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Hex encoded SHA-256 of a file's full content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileFingerprint(String);

impl FileFingerprint {
    pub fn from_hex(hex: impl Into<String>) -> Self {
        FileFingerprint(hex.into())
    }

    #[allow(dead_code)]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FingerprintSet(BTreeMap<String, FileFingerprint>);

impl FingerprintSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the fingerprint for `path`, returning the one it replaced.
    pub fn insert(
        &mut self,
        path: impl Into<String>,
        fingerprint: FileFingerprint,
    ) -> Option<FileFingerprint> {
        self.0.insert(path.into(), fingerprint)
    }

    pub fn get(&self, path: &str) -> Option<&FileFingerprint> {
        self.0.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates entries in lexicographic path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FileFingerprint)> {
        self.0.iter().map(|(path, fp)| (path.as_str(), fp))
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl FromIterator<(String, FileFingerprint)> for FingerprintSet {
    fn from_iter<I: IntoIterator<Item = (String, FileFingerprint)>>(iter: I) -> Self {
        FingerprintSet(iter.into_iter().collect())
    }
}
