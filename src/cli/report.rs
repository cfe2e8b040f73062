//! Publish a WebLOAD Analytics report.
//!
//! ```bash
//! webload-ci report --session 'ls${BUILD_NUMBER}.ls'
//! webload-ci report --session run.ls --format pdf --report-name nightly --location out
//! webload-ci report --session 'ls${BUILD_NUMBER}.ls' --compare baseline.ls --compare-builds 3
//! ```
//!
//! `--compare` sessions come first, then up to `--compare-builds` sessions
//! from previous builds, newest first. The build fails when the analytics
//! tool exits non-zero.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::common::JobArgs;
use crate::steps::GenerateReportStep;
use crate::tool::{OutputFormat, ProcessLauncher};

/// Command to publish a report.
#[derive(Args, Debug)]
pub struct ReportCommand {
    /// Primary load session, relative to the workspace; `${VAR}` is expanded
    #[arg(long, value_name = "LS")]
    pub session: String,

    /// Portfolio to publish [default: Summary Portfolio]
    #[arg(long, value_name = "NAME")]
    pub portfolio: Option<String>,

    /// Report format
    #[arg(long, value_enum, ignore_case = true)]
    pub format: Option<OutputFormat>,

    /// Directory the report is written to [default: workspace]
    #[arg(long, value_name = "DIR")]
    pub location: Option<String>,

    /// Name of the published report
    #[arg(long, value_name = "NAME")]
    pub report_name: Option<String>,

    /// Comma separated sessions to compare against, relative to the workspace
    #[arg(long, value_name = "LS,LS")]
    pub compare: Option<String>,

    /// Compare against the sessions of this many previous builds
    #[arg(long, default_value_t = 0, value_name = "N")]
    pub compare_builds: usize,

    #[command(flatten)]
    pub job: JobArgs,
}

impl ReportCommand {
    /// The step these options describe.
    #[must_use]
    pub fn step(&self) -> GenerateReportStep {
        GenerateReportStep {
            session: self.session.clone(),
            portfolio: self.portfolio.clone(),
            format: self.format,
            location: self.location.clone(),
            report_name: self.report_name.clone(),
            compare: self.compare.clone(),
            compare_builds: self.compare_builds,
        }
    }

    pub async fn execute(self, config_path: Option<PathBuf>) -> Result<i32> {
        let job = self.job.job_context(config_path).await?;
        let outcome = self.step().run(&job, &ProcessLauncher).await?;
        self.job.finish(&outcome)
    }
}
