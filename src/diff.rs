use crate::fingerprint::FingerprintSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Present in both, with a different content fingerprint.
    Modified,
    /// Present in the baseline only.
    Deleted,
    /// Present in the current scan only.
    New,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub path: String,
    pub kind: ChangeKind,
}

/// Classification of every path in `baseline ∪ current`.
///
/// Deviations are kept in report order: deleted and modified paths first (in
/// baseline path order), then new paths (in current path order). Unchanged
/// paths are only counted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeReport {
    deviations: Vec<Change>,
    unchanged: usize,
}

impl ChangeReport {
    pub fn deviations(&self) -> &[Change] {
        &self.deviations
    }

    pub fn is_clean(&self) -> bool {
        self.deviations.is_empty()
    }

    pub fn unchanged_count(&self) -> usize {
        self.unchanged
    }
}

/// Compare a baseline against a fresh scan.
///
/// Identity is path plus content: a file deleted and recreated with other
/// content at the same path is `Modified`.
pub fn diff(baseline: &FingerprintSet, current: &FingerprintSet) -> ChangeReport {
    let mut report = ChangeReport::default();

    for (path, recorded) in baseline.iter() {
        let kind = match current.get(path) {
            None => ChangeKind::Deleted,
            Some(observed) if observed != recorded => ChangeKind::Modified,
            Some(_) => {
                report.unchanged += 1;
                continue;
            }
        };
        report.deviations.push(Change {
            path: path.to_string(),
            kind,
        });
    }

    for path in current.paths() {
        if !baseline.contains(path) {
            report.deviations.push(Change {
                path: path.to_string(),
                kind: ChangeKind::New,
            });
        }
    }

    report
}
