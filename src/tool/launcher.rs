//! Launching a [`ToolInvocation`] as a child process.
//!
//! The launcher is the only place that touches processes. It streams the
//! tool's stdout line by line to our stdout while the tool runs, leaves
//! stderr attached to the parent, and reports the exit code. There is no
//! timeout; a hung tool is left to the CI server to abandon.
//!
//! Tool output is not assumed to be UTF-8: each line is forwarded with
//! invalid sequences replaced, and output problems never cost the exit code.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::future::Future;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout};
use tokio::process::{ChildStdout, Command};

use super::ToolInvocation;

/// Exit code reported when the process was terminated by a signal.
pub const SIGNALLED_EXIT_CODE: i32 = -1;

/// Runs tool invocations. Implemented by [`ProcessLauncher`] and by test doubles.
pub trait Launcher {
    /// Run `invocation` in `working_dir` with exactly `env` as its environment
    /// added on top of the inherited one, returning the exit code.
    fn launch(
        &self,
        invocation: &ToolInvocation,
        working_dir: &Path,
        env: &BTreeMap<String, String>,
    ) -> impl Future<Output = Result<i32>> + Send;
}

/// Launches the real executable with `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    async fn launch(
        &self,
        invocation: &ToolInvocation,
        working_dir: &Path,
        env: &BTreeMap<String, String>,
    ) -> Result<i32> {
        let start = std::time::Instant::now();
        tracing::info!(target: "webload::tool", "Executing the command {}", invocation.to_display_string());

        let mut cmd = Command::new(invocation.executable());
        cmd.args(invocation.args())
            .current_dir(working_dir)
            .envs(env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());

        let mut child = cmd
            .spawn()
            .with_context(|| format!("Failed to start {}", invocation.executable().display()))?;

        if let Some(stdout) = child.stdout.take() {
            forward_output(stdout).await;
        }

        let status = child
            .wait()
            .await
            .with_context(|| format!("Failed to wait for {}", invocation.executable().display()))?;

        let code = status.code().unwrap_or(SIGNALLED_EXIT_CODE);
        tracing::info!(
            target: "webload::tool",
            "Execution ended with exit code {} after {:.2}s",
            code,
            start.elapsed().as_secs_f64()
        );
        Ok(code)
    }
}

/// Copy the tool's stdout to ours until it closes.
async fn forward_output(stdout: ChildStdout) {
    let mut reader = BufReader::new(stdout);
    let mut out = Some(tokio::io::stdout());
    let mut line = Vec::new();

    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(target: "webload::tool", "Stopped reading tool output: {}", e);
                break;
            }
        }

        // Keep draining after a write failure so the tool never blocks on a full pipe.
        if let Some(writer) = out.as_mut() {
            let text = String::from_utf8_lossy(&line);
            if let Err(e) = write_line(writer, text.trim_end_matches(['\r', '\n'])).await {
                tracing::warn!(target: "webload::tool", "Cannot forward tool output: {}", e);
                out = None;
            }
        }
    }
}

async fn write_line(out: &mut Stdout, line: &str) -> std::io::Result<()> {
    out.write_all(line.as_bytes()).await?;
    out.write_all(b"\n").await?;
    out.flush().await
}
