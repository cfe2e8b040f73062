//! Publishing an analytics report over one or more load sessions.

use anyhow::Result;
use chrono::Utc;

use super::{JobContext, StepState, StepTracker};
use crate::constants::ANALYTICS_EXECUTABLE;
use crate::core::{BuildResult, StepOutcome, WebloadError};
use crate::history::{SessionHistoryWalker, SessionReference};
use crate::installation::require_executable;
use crate::tool::{InvocationMode, Launcher, OutputFormat, ReportArgs, ToolInvocation};
use crate::utils::expand_vars;
use crate::validation::check_session_file;

/// Settings of a generate-report step.
#[derive(Debug, Clone, Default)]
pub struct GenerateReportStep {
    /// Primary load session, relative to the workspace; may reference job variables
    pub session: String,
    /// Portfolio to publish
    pub portfolio: Option<String>,
    /// Output format
    pub format: Option<OutputFormat>,
    /// Output location, the workspace when unset
    pub location: Option<String>,
    /// Report name
    pub report_name: Option<String>,
    /// Comma separated sessions to compare against
    pub compare: Option<String>,
    /// Number of prior builds to compare against
    pub compare_builds: usize,
}

impl GenerateReportStep {
    /// Publish the report. The result follows the tool's exit code.
    pub async fn run<L: Launcher>(&self, job: &JobContext, launcher: &L) -> Result<StepOutcome> {
        let mut tracker = StepTracker::new(InvocationMode::GenerateReport);
        self.run_with(job, launcher, &mut tracker).await
    }

    /// Like [`run`](Self::run), recording the phases in `tracker`. On error the
    /// tracker ends in [`StepState::Failed`].
    pub async fn run_with<L: Launcher>(
        &self,
        job: &JobContext,
        launcher: &L,
        tracker: &mut StepTracker,
    ) -> Result<StepOutcome> {
        match self.run_tracked(job, launcher, tracker).await {
            Ok(mut outcome) => {
                tracker.advance(StepState::Done);
                outcome.states = tracker.visited().to_vec();
                Ok(outcome)
            }
            Err(e) => {
                tracker.fail(&e);
                Err(e)
            }
        }
    }

    /// Comparison sessions for this job, explicit ones first.
    #[must_use]
    pub fn comparison_sessions(&self, job: &JobContext) -> Vec<SessionReference> {
        let history = job.history();
        SessionHistoryWalker::new(&job.workspace, &job.env).collect(
            self.compare.as_deref(),
            &self.session,
            self.compare_builds,
            &*history,
        )
    }

    async fn run_tracked<L: Launcher>(
        &self,
        job: &JobContext,
        launcher: &L,
        tracker: &mut StepTracker,
    ) -> Result<StepOutcome> {
        let started_at = Utc::now();
        let executable = require_executable(&job.search_config(), ANALYTICS_EXECUTABLE)?;

        tracker.advance(StepState::ValidateInputs);
        if check_session_file(&self.session).log("session").is_error() {
            return Err(WebloadError::ConfigError {
                message: "Load session file not specified".to_string(),
            }
            .into());
        }
        job.require_workspace()?;

        let primary = job.workspace.join(expand_vars(&self.session, &job.env));
        if !primary.is_file() {
            return Err(WebloadError::SessionFileMissing {
                path: primary.display().to_string(),
            }
            .into());
        }

        tracker.advance(StepState::BuildArgs);
        let comparisons = self.comparison_sessions(job);
        tracing::debug!(target: "webload::step", "Comparing against {} session(s)", comparisons.len());

        let invocation = ToolInvocation::report(
            &executable,
            &ReportArgs {
                portfolio: self.portfolio.clone(),
                primary_session: primary,
                comparisons: comparisons.into_iter().map(|s| s.path).collect(),
                format: self.format,
                location: self.location.clone(),
                default_location: job.workspace.clone(),
                report_name: self.report_name.clone(),
            },
        );

        tracker.advance(StepState::Launch);
        let exit_code = launcher.launch(&invocation, &job.workspace, &job.env).await?;
        tracing::info!(target: "webload::step", "Execution ended");

        Ok(StepOutcome {
            mode: InvocationMode::GenerateReport,
            exit_code,
            result: BuildResult::from_exit_code(exit_code),
            extraction: None,
            started_at,
            finished_at: Utc::now(),
            states: Vec::new(),
        })
    }
}
