//! The two build steps and the job they run in.
//!
//! A build step composes the rest of the crate: it resolves the installation,
//! checks its inputs, builds a [`ToolInvocation`](crate::tool::ToolInvocation),
//! hands it to a [`Launcher`](crate::tool::Launcher) and interprets what the
//! tool left behind.
//!
//! - [`ExecuteSessionStep`] runs a load session template with the console
//! - [`GenerateReportStep`] publishes an analytics report
//!
//! Both are generic over the launcher, so tests substitute a fake that writes
//! the files the real tool would.

pub mod report;
pub mod session;
pub mod state;

use anyhow::Result;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::config::GlobalConfig;
use crate::constants::BUILD_NUMBER_VAR;
use crate::core::WebloadError;
use crate::history::{BuildHistory, BuildRecord, FsBuildHistory};
use crate::installation::PathSearchConfig;

pub use report::GenerateReportStep;
pub use session::{ExecuteSessionStep, session_file_name};
pub use state::{StepState, StepTracker};

/// Everything a step knows about the job it runs in.
#[derive(Debug, Clone, Default)]
pub struct JobContext {
    /// Workspace the tool runs in and writes to
    pub workspace: PathBuf,
    /// Process environment merged with the build variables
    pub env: BTreeMap<String, String>,
    /// Build variables given for this build only
    pub build_vars: BTreeMap<String, String>,
    /// Persisted global settings
    pub global: GlobalConfig,
    /// Directory holding per-build records, if the job keeps history
    pub job_dir: Option<PathBuf>,
    /// Number of the running build
    pub build_number: Option<u64>,
}

impl JobContext {
    /// Inputs for locating the installation.
    #[must_use]
    pub fn search_config(&self) -> PathSearchConfig {
        PathSearchConfig::from_sources(&self.env, &self.global)
    }

    /// Fail unless the workspace is an existing directory.
    pub fn require_workspace(&self) -> Result<()> {
        if !self.workspace.is_dir() {
            return Err(WebloadError::ConfigError {
                message: format!("Workspace not found: {}", self.workspace.display()),
            }
            .into());
        }
        Ok(())
    }

    /// Prior builds of this job; empty without a job directory.
    #[must_use]
    pub fn history(&self) -> Box<dyn BuildHistory> {
        match &self.job_dir {
            Some(dir) => Box::new(FsBuildHistory::new(dir.clone(), self.build_number)),
            None => Box::new(Vec::<BuildRecord>::new()),
        }
    }

    /// Record of the running build, when both a job directory and a build
    /// number are known.
    #[must_use]
    pub fn current_build(&self) -> Option<(PathBuf, BuildRecord)> {
        let job_dir = self.job_dir.clone()?;
        let number = self.build_number?;
        let mut environment = self.build_vars.clone();
        environment.insert(BUILD_NUMBER_VAR.to_string(), number.to_string());
        let record = BuildRecord::new(&job_dir, number, environment);
        Some((job_dir, record))
    }
}
