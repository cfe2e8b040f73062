//! Test utilities for webload-ci
//!
//! Helpers for exercising the build steps without a WebLOAD installation:
//!
//! - [`TestWorkspace`] - a temporary workspace, job directory and fake
//!   installation root, plus a ready-made [`JobContext`](crate::steps::JobContext)
//! - [`FakeLauncher`] - a [`Launcher`](crate::tool::Launcher) that records
//!   invocations and writes the files the console would
//! - [`FakeInstallation`] - an installation root whose executables are shell
//!   scripts, for driving the real binary from integration tests on Unix
//!
//! # Example
//!
//! ```rust,ignore
//! use webload_ci::steps::GenerateReportStep;
//! use webload_ci::test_utils::{FakeLauncher, TestWorkspace};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let ws = TestWorkspace::new();
//! ws.touch("demo.ls");
//! let step = GenerateReportStep { session: "demo.ls".into(), ..Default::default() };
//! let _outcome = step.run(&ws.job(None), &FakeLauncher::new(0)).await?;
//! # Ok(())
//! # }
//! ```

pub mod installation;
pub mod launcher;
pub mod workspace;

pub use installation::FakeInstallation;
pub use launcher::FakeLauncher;
pub use workspace::TestWorkspace;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests, once per process.
///
/// Uses `level` when given, else `RUST_LOG`; with neither, logging stays off.
///
/// ```bash
/// RUST_LOG=webload=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
