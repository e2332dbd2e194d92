use crate::baseline::{BaselineError, BaselineFile, BaselineStore, DEFAULT_BASELINE_FILENAME};
use crate::diff::{ChangeReport, diff};
use crate::fingerprint::FingerprintSet;
use crate::scan::{ScanError, scan};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Directory does not exist: {0}")]
    TargetNotFound(PathBuf),
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("No baseline found at {0}. Please run 'init' first.")]
    BaselineMissing(PathBuf),
    #[error("{0}. Re-run 'init' to create a fresh baseline.")]
    BaselineCorrupt(BaselineError),
    #[error("Baseline error: {0}")]
    Baseline(BaselineError),
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
}

impl From<BaselineError> for EngineError {
    fn from(e: BaselineError) -> Self {
        match e {
            BaselineError::Missing(path) => EngineError::BaselineMissing(path),
            e @ (BaselineError::Corrupt { .. } | BaselineError::UnsupportedVersion { .. }) => {
                EngineError::BaselineCorrupt(e)
            }
            e => EngineError::Baseline(e),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SentinelConfig {
    /// Where the baseline artifact lives. Relative paths resolve against the
    /// working directory.
    pub baseline_path: PathBuf,
}

impl Default for SentinelConfig {
    fn default() -> Self {
        SentinelConfig {
            baseline_path: PathBuf::from(DEFAULT_BASELINE_FILENAME),
        }
    }
}

#[derive(Debug)]
pub struct InitSummary {
    pub files_tracked: usize,
    pub baseline_path: PathBuf,
}

/// Fails unless `root` exists and is a directory.
pub fn ensure_target(root: &Path) -> Result<(), EngineError> {
    if !root.exists() {
        return Err(EngineError::TargetNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(EngineError::NotADirectory(root.to_path_buf()));
    }
    Ok(())
}

/// Baselines and checks one directory tree against one baseline artifact.
pub struct Sentinel {
    root: PathBuf,
    store: BaselineStore,
}

impl Sentinel {
    pub fn new(root: impl Into<PathBuf>, config: SentinelConfig) -> Self {
        Sentinel {
            root: root.into(),
            store: BaselineStore::new(config.baseline_path),
        }
    }

    pub fn baseline_path(&self) -> &Path {
        self.store.path()
    }

    /// Scan the tree and record the result as the baseline, replacing any
    /// previous one.
    pub fn init(&self) -> Result<InitSummary, EngineError> {
        let fingerprints = self.scan()?;
        self.store.save(&fingerprints)?;

        info!(
            "Recorded {} fingerprints in {}",
            fingerprints.len(),
            self.store.path().display()
        );

        Ok(InitSummary {
            files_tracked: fingerprints.len(),
            baseline_path: self.store.path().to_path_buf(),
        })
    }

    pub fn load_baseline(&self) -> Result<BaselineFile, EngineError> {
        Ok(self.store.load()?)
    }

    /// Scan the tree and classify it against `baseline`.
    pub fn check(&self, baseline: &BaselineFile) -> Result<ChangeReport, EngineError> {
        let current = self.scan()?;
        let report = diff(baseline.fingerprints(), &current);

        info!(
            "{} unchanged, {} deviations",
            report.unchanged_count(),
            report.deviations().len()
        );

        Ok(report)
    }

    fn scan(&self) -> Result<FingerprintSet, EngineError> {
        let excluded = self.store.resolved_path()?;
        Ok(scan(&self.root, &excluded)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::ChangeKind;
    use std::fs;
    use tempfile::TempDir;

    /// Tree under `<temp>/tree`, baseline at `<temp>/baseline.toml`.
    fn setup() -> (TempDir, Sentinel) {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("tree")).unwrap();
        let sentinel = Sentinel::new(
            temp.path().join("tree"),
            SentinelConfig {
                baseline_path: temp.path().join("baseline.toml"),
            },
        );
        (temp, sentinel)
    }

    #[test]
    fn test_init_then_check_scenario() {
        let (temp, sentinel) = setup();
        let tree = temp.path().join("tree");
        fs::write(tree.join("a.txt"), "hello").unwrap();
        fs::write(tree.join("b.txt"), "world").unwrap();

        let summary = sentinel.init().unwrap();
        assert_eq!(summary.files_tracked, 2);
        assert_eq!(summary.baseline_path, temp.path().join("baseline.toml"));

        fs::remove_file(tree.join("a.txt")).unwrap();
        fs::write(tree.join("b.txt"), "worldx").unwrap();
        fs::write(tree.join("c.txt"), "new").unwrap();

        let baseline = sentinel.load_baseline().unwrap();
        let report = sentinel.check(&baseline).unwrap();

        let found: Vec<_> = report
            .deviations()
            .iter()
            .map(|c| (c.path.as_str(), c.kind))
            .collect();
        assert_eq!(
            found,
            vec![
                ("a.txt", ChangeKind::Deleted),
                ("b.txt", ChangeKind::Modified),
                ("c.txt", ChangeKind::New),
            ]
        );
    }

    #[test]
    fn test_empty_directory() {
        let (_temp, sentinel) = setup();

        let summary = sentinel.init().unwrap();
        assert_eq!(summary.files_tracked, 0);

        let baseline = sentinel.load_baseline().unwrap();
        let report = sentinel.check(&baseline).unwrap();
        assert!(report.is_clean());
    }

    #[test]
    fn test_recreated_file_with_other_content_is_modified() {
        let (temp, sentinel) = setup();
        let file = temp.path().join("tree/a.txt");
        fs::write(&file, "one").unwrap();
        sentinel.init().unwrap();

        fs::remove_file(&file).unwrap();
        fs::write(&file, "two").unwrap();

        let baseline = sentinel.load_baseline().unwrap();
        let report = sentinel.check(&baseline).unwrap();
        assert_eq!(report.deviations().iter().filter(|c| c.kind == ChangeKind::Modified).count(), 1);
        assert_eq!(report.deviations().len(), 1);
    }

    #[test]
    fn test_baseline_inside_scanned_tree_is_never_tracked() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "hello").unwrap();
        let sentinel = Sentinel::new(
            temp.path(),
            SentinelConfig {
                baseline_path: temp.path().join(DEFAULT_BASELINE_FILENAME),
            },
        );

        let summary = sentinel.init().unwrap();
        assert_eq!(summary.files_tracked, 1);

        let baseline = sentinel.load_baseline().unwrap();
        assert!(!baseline.fingerprints().contains(DEFAULT_BASELINE_FILENAME));

        // Re-running init rewrites the artifact; still not a deviation.
        sentinel.init().unwrap();
        let baseline = sentinel.load_baseline().unwrap();
        assert!(sentinel.check(&baseline).unwrap().is_clean());
    }

    #[test]
    fn test_load_missing_baseline() {
        let (_temp, sentinel) = setup();

        assert!(matches!(
            sentinel.load_baseline(),
            Err(EngineError::BaselineMissing(_))
        ));
    }

    #[test]
    fn test_load_corrupt_baseline() {
        let (_temp, sentinel) = setup();
        fs::write(sentinel.baseline_path(), "not = [valid").unwrap();

        let err = sentinel.load_baseline().unwrap_err();
        assert!(matches!(err, EngineError::BaselineCorrupt(_)));
        assert!(err.to_string().contains("corrupt"));
    }

    #[test]
    fn test_ensure_target() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        assert!(ensure_target(temp.path()).is_ok());
        assert!(matches!(
            ensure_target(&temp.path().join("missing")),
            Err(EngineError::TargetNotFound(_))
        ));
        assert!(matches!(
            ensure_target(&file),
            Err(EngineError::NotADirectory(_))
        ));
    }
}
