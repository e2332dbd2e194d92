use assert_cmd::{Command, cargo::cargo_bin_cmd};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A scratch working directory (where the baseline lands by default) with the
/// tree to watch in its `tree/` subdirectory.
#[allow(dead_code)]
pub struct Workspace {
    pub temp: TempDir,
}

#[allow(dead_code)]
impl Workspace {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("tree")).unwrap();
        Workspace { temp }
    }

    pub fn cwd(&self) -> &Path {
        self.temp.path()
    }

    pub fn tree(&self) -> PathBuf {
        self.temp.path().join("tree")
    }

    pub fn baseline(&self) -> PathBuf {
        self.temp.path().join("sentinel_baseline.toml")
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.tree().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
}

pub fn sentinel_cmd(cwd: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("sentinel");
    cmd.current_dir(cwd);
    cmd
}

// Each integration test file is compiled as its own crate, and not all of
// them run both modes.
#[allow(dead_code)]
pub fn init(ws: &Workspace) {
    sentinel_cmd(ws.cwd())
        .arg("init")
        .arg("tree")
        .assert()
        .success();
}
