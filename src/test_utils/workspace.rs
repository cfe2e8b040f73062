//! Temporary job layouts.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::constants::{ANALYTICS_EXECUTABLE, BIN_DIR, BUILD_NUMBER_VAR, CONSOLE_EXECUTABLE, WL_HOME_VAR};
use crate::steps::JobContext;

/// A temporary directory holding a workspace, a job directory and an
/// installation root with placeholder executables.
///
/// ```text
/// <root>/
/// ├── ws/
/// ├── job/
/// └── webload/bin/{webload.exe, WLAnalyticsCmd.exe}
/// ```
pub struct TestWorkspace {
    temp: TempDir,
}

impl TestWorkspace {
    /// Create the layout. Panics if the temporary directory cannot be set up.
    #[must_use]
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let ws = Self { temp };
        std::fs::create_dir_all(ws.workspace()).expect("Failed to create workspace");
        std::fs::create_dir_all(ws.job_dir()).expect("Failed to create job dir");

        let bin = ws.install_root().join(BIN_DIR);
        std::fs::create_dir_all(&bin).expect("Failed to create bin dir");
        for exe in [CONSOLE_EXECUTABLE, ANALYTICS_EXECUTABLE] {
            std::fs::write(bin.join(exe), "").expect("Failed to create executable");
        }
        ws
    }

    /// Root of the temporary directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    #[must_use]
    pub fn workspace(&self) -> PathBuf {
        self.root().join("ws")
    }

    #[must_use]
    pub fn job_dir(&self) -> PathBuf {
        self.root().join("job")
    }

    #[must_use]
    pub fn install_root(&self) -> PathBuf {
        self.root().join("webload")
    }

    /// Create an empty file at `name` inside the workspace.
    pub fn touch(&self, name: &str) -> PathBuf {
        let path = self.workspace().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        std::fs::write(&path, "").expect("Failed to touch file");
        path
    }

    /// A job with `WL_HOME` pointing at the fake installation and, when
    /// given, `BUILD_NUMBER` set.
    #[must_use]
    pub fn job(&self, build_number: Option<u64>) -> JobContext {
        let mut env = BTreeMap::new();
        env.insert(WL_HOME_VAR.to_string(), self.install_root().display().to_string());
        if let Some(number) = build_number {
            env.insert(BUILD_NUMBER_VAR.to_string(), number.to_string());
        }

        JobContext {
            workspace: self.workspace(),
            env,
            build_vars: BTreeMap::new(),
            global: crate::config::GlobalConfig::default(),
            job_dir: Some(self.job_dir()),
            build_number,
        }
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}
