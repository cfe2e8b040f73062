//! Shared fixtures for the integration tests.

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use webload_ci::test_utils::FakeInstallation;

/// Variables that would leak the host job into a test run.
const ISOLATED_VARS: [&str; 5] = ["WL_HOME", "BUILD_NUMBER", "WORKSPACE", "WEBLOAD_CI_JOB_DIR", "RUST_LOG"];

/// A temporary agent: workspace, job directory, config file and an
/// installation root.
pub struct TestAgent {
    temp: TempDir,
    pub installation: FakeInstallation,
}

impl TestAgent {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("ws")).unwrap();
        std::fs::create_dir_all(temp.path().join("job")).unwrap();
        let installation = FakeInstallation::new(temp.path().join("webload"));
        Self {
            temp,
            installation,
        }
    }

    pub fn workspace(&self) -> PathBuf {
        self.temp.path().join("ws")
    }

    pub fn job_dir(&self) -> PathBuf {
        self.temp.path().join("job")
    }

    pub fn config_path(&self) -> PathBuf {
        self.temp.path().join("config.toml")
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    /// Replace the installation, e.g. with a differently scripted console.
    pub fn with_installation(mut self, f: impl FnOnce(FakeInstallation) -> FakeInstallation) -> Self {
        self.installation = f(self.installation);
        self
    }

    /// `webload-ci --config <agent config>` with a clean environment.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("webload-ci").unwrap();
        for var in ISOLATED_VARS {
            cmd.env_remove(var);
        }
        cmd.env("NO_COLOR", "1");
        cmd.arg("--config").arg(self.config_path());
        cmd
    }

    /// Like [`cmd`](Self::cmd), with `WL_HOME` pointing at the fake installation.
    pub fn cmd_with_home(&self) -> Command {
        let mut cmd = self.cmd();
        cmd.env("WL_HOME", self.installation.root());
        cmd
    }

    /// Create a file in the workspace.
    pub fn touch(&self, name: &str) -> PathBuf {
        let path = self.workspace().join(name);
        std::fs::write(&path, "").unwrap();
        path
    }

    /// Archive `name` as if build `number` had produced it.
    pub fn archive_previous(&self, number: u64, name: &str) -> PathBuf {
        let dir = self.job_dir().join("builds").join(number.to_string()).join("archive");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, "").unwrap();
        path
    }
}
