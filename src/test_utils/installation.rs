//! Scripted WebLOAD installations for end-to-end tests.
//!
//! The executables keep their Windows names but are `/bin/sh` scripts, so
//! the real binary can resolve and launch them on Unix hosts.

use std::path::{Path, PathBuf};

use crate::constants::{ANALYTICS_EXECUTABLE, BIN_DIR, CONSOLE_EXECUTABLE, RESULTS_FILE_NAME};

/// File the fake analytics tool writes its arguments to, one per line.
pub const ANALYTICS_ARGS_FILE: &str = "analytics-args.txt";

/// An installation root under a caller-owned directory.
#[derive(Debug, Clone)]
pub struct FakeInstallation {
    root: PathBuf,
}

impl FakeInstallation {
    /// Lay out `<root>/bin`. No executables are written yet.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        std::fs::create_dir_all(root.join(BIN_DIR)).expect("Failed to create bin dir");
        Self { root }
    }

    /// Installation root, the value for `WL_HOME`.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// A console that writes a results file with `return_code`, creates the
    /// session file unless `create_session` is false, and exits with `exit_code`.
    pub fn with_console(self, return_code: &str, create_session: bool, exit_code: i32) -> Self {
        let touch = if create_session { ": > \"$session\"" } else { ":" };
        let body = format!(
            r#"session="$2"
results="{RESULTS_FILE_NAME}"
while [ $# -gt 0 ]; do
  if [ "$1" = "/rc" ]; then results="$2"; fi
  shift
done
echo "console: running session"
printf '%s\n' '<root>' '<el SessionReturnCode="{return_code}"/>' '<el ErrorDescription="scripted run"/>' '</root>' > "$results"
{touch}
exit {exit_code}"#
        );
        self.write_script(CONSOLE_EXECUTABLE, &body);
        self
    }

    /// A console that exits without writing anything.
    pub fn with_silent_console(self, exit_code: i32) -> Self {
        self.write_script(CONSOLE_EXECUTABLE, &format!("exit {exit_code}"));
        self
    }

    /// An analytics tool that records its arguments in the working directory
    /// and exits with `exit_code`.
    pub fn with_analytics(self, exit_code: i32) -> Self {
        let body = format!(
            "for arg in \"$@\"; do printf '%s\\n' \"$arg\"; done > {ANALYTICS_ARGS_FILE}\nexit {exit_code}"
        );
        self.write_script(ANALYTICS_EXECUTABLE, &body);
        self
    }

    fn write_script(&self, name: &str, body: &str) {
        let path = self.root.join(BIN_DIR).join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("Failed to write script");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&path).expect("Failed to stat script").permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&path, perms).expect("Failed to make script executable");
        }
    }
}
