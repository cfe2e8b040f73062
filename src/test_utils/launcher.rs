//! A launcher that pretends to be WebLOAD.

use anyhow::Result;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;

use crate::tool::{InvocationMode, Launcher, ToolInvocation};
use crate::utils::replace_extension;

/// Records every invocation and, for session runs, writes the results file
/// and session files the console would have written.
#[derive(Debug, Default)]
pub struct FakeLauncher {
    exit_code: i32,
    results: Option<Vec<u8>>,
    session_extensions: Vec<String>,
    invocations: Mutex<Vec<ToolInvocation>>,
}

impl FakeLauncher {
    /// A launcher whose tool exits with `exit_code` and writes nothing.
    #[must_use]
    pub fn new(exit_code: i32) -> Self {
        Self {
            exit_code,
            ..Self::default()
        }
    }

    /// Write `content` to the `/rc` results file.
    #[must_use]
    pub fn with_results(mut self, content: impl AsRef<[u8]>) -> Self {
        self.results = Some(content.as_ref().to_vec());
        self
    }

    /// Write the session file with each of `extensions`.
    #[must_use]
    pub fn with_session_files(mut self, extensions: &[&str]) -> Self {
        self.session_extensions = extensions.iter().map(|e| (*e).to_string()).collect();
        self
    }

    /// Invocations seen so far.
    pub fn invocations(&self) -> Vec<ToolInvocation> {
        self.invocations.lock().expect("invocation log poisoned").clone()
    }

    fn write_session_outputs(&self, invocation: &ToolInvocation) -> Result<()> {
        if let Some(text) = &self.results {
            let results = invocation
                .flag_args()
                .iter()
                .find(|(name, _)| name == "/rc")
                .and_then(|(_, value)| value.clone());
            if let Some(results) = results {
                std::fs::write(results, text)?;
            }
        }

        if let Some(session) = invocation.positional_args().get(1) {
            for ext in &self.session_extensions {
                let path = replace_extension(session, ext);
                if let Some(parent) = Path::new(&path).parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, ext)?;
            }
        }
        Ok(())
    }
}

impl Launcher for FakeLauncher {
    async fn launch(
        &self,
        invocation: &ToolInvocation,
        _working_dir: &Path,
        _env: &BTreeMap<String, String>,
    ) -> Result<i32> {
        self.invocations
            .lock()
            .expect("invocation log poisoned")
            .push(invocation.clone());

        if invocation.mode() == InvocationMode::ExecuteSession {
            self.write_session_outputs(invocation)?;
        }
        Ok(self.exit_code)
    }
}
