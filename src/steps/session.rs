//! Running a load session with the WebLOAD console.

use anyhow::{Context, Result};
use chrono::Utc;
use std::collections::BTreeMap;

use super::{JobContext, StepState, StepTracker};
use crate::archive::archive_session_files;
use crate::constants::{CONSOLE_EXECUTABLE, RESULTS_FILE_NAME, SESSION_EXTENSION};
use crate::core::{BuildResult, StepOutcome, WebloadError};
use crate::extract::ExtractionResult;
use crate::installation::require_executable;
use crate::tool::{InvocationMode, Launcher, SessionArgs, ToolInvocation};
use crate::utils::{expand_vars, replace_extension};
use crate::validation::check_template;

/// Settings of an execute-session step.
#[derive(Debug, Clone, Default)]
pub struct ExecuteSessionStep {
    /// Load session template passed to the console
    pub template: String,
    /// Session file to write; derived from the template when unset
    pub session_file: Option<String>,
    /// Virtual clients, ignored when zero
    pub virtual_clients: u64,
    /// Probing clients, ignored when zero
    pub probing_clients: u64,
    /// Run duration in seconds, ignored when zero
    pub execution_duration: u64,
}

/// Workspace-relative name of the session file a run writes.
///
/// Takes `session_file` when set, else the template, swaps its extension for
/// `.ls` and then expands job variables.
#[must_use]
pub fn session_file_name(template: &str, session_file: Option<&str>, env: &BTreeMap<String, String>) -> String {
    let name = session_file.filter(|s| !s.is_empty()).unwrap_or(template);
    expand_vars(&replace_extension(name, SESSION_EXTENSION), env)
}

impl ExecuteSessionStep {
    /// Run the session and map the console's verdict to a build result.
    pub async fn run<L: Launcher>(&self, job: &JobContext, launcher: &L) -> Result<StepOutcome> {
        let mut tracker = StepTracker::new(InvocationMode::ExecuteSession);
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

    async fn run_tracked<L: Launcher>(
        &self,
        job: &JobContext,
        launcher: &L,
        tracker: &mut StepTracker,
    ) -> Result<StepOutcome> {
        let started_at = Utc::now();
        let executable = require_executable(&job.search_config(), CONSOLE_EXECUTABLE)?;

        tracker.advance(StepState::ValidateInputs);
        if check_template(&self.template).log("template").is_error() {
            return Err(WebloadError::ConfigError {
                message: "Template file not specified".to_string(),
            }
            .into());
        }
        job.require_workspace()?;

        tracker.advance(StepState::BuildArgs);
        let session_name = session_file_name(&self.template, self.session_file.as_deref(), &job.env);
        let session_path = job.workspace.join(&session_name);
        let results_path = job.workspace.join(RESULTS_FILE_NAME);
        if results_path.exists() {
            tokio::fs::remove_file(&results_path).await.with_context(|| {
                format!("Failed to remove stale results file: {}", results_path.display())
            })?;
        }

        let invocation = ToolInvocation::session(
            &executable,
            &SessionArgs {
                template: self.template.clone(),
                session_file: session_path.clone(),
                results_file: results_path.clone(),
                virtual_clients: self.virtual_clients,
                probing_clients: self.probing_clients,
                execution_duration: self.execution_duration,
            },
        )?;

        tracker.advance(StepState::Launch);
        let exit_code = launcher.launch(&invocation, &job.workspace, &job.env).await?;
        tracing::info!(target: "webload::step", "Execution ended, parsing return code");

        tracker.advance(StepState::AwaitResultsFile);
        if !results_path.is_file() {
            return Err(WebloadError::ResultsFileMissing {
                path: results_path.display().to_string(),
            }
            .into());
        }

        tracker.advance(StepState::ParseResults);
        let content = tokio::fs::read(&results_path)
            .await
            .with_context(|| format!("Failed to read results file: {}", results_path.display()))?;
        // Consoles write results in the host code page.
        let text = String::from_utf8_lossy(&content);
        tracing::info!(target: "webload::step", "{}", text);

        let extraction = ExtractionResult::parse(&text);
        tracing::info!(
            target: "webload::step",
            "SessionReturnCode {}",
            extraction.session_return_code.as_deref().unwrap_or("<none>")
        );
        tracing::info!(
            target: "webload::step",
            "ErrorDescription {}",
            extraction.error_description.as_deref().unwrap_or("<none>")
        );

        let verdict = if extraction.is_passed() {
            BuildResult::Success
        } else {
            tracing::warn!(target: "webload::step", "Load session did not pass, marking build unstable");
            BuildResult::Unstable
        };

        if !session_path.is_file() {
            return Err(WebloadError::SessionFileMissing {
                path: session_path.display().to_string(),
            }
            .into());
        }

        tracker.advance(StepState::Archive);
        self.archive(job, &session_name);

        Ok(StepOutcome {
            mode: InvocationMode::ExecuteSession,
            exit_code,
            result: BuildResult::from_exit_code(exit_code).combine(verdict),
            extraction: Some(extraction),
            started_at,
            finished_at: Utc::now(),
            states: Vec::new(),
        })
    }

    fn archive(&self, job: &JobContext, session_name: &str) {
        let Some((job_dir, record)) = job.current_build() else {
            tracing::debug!(target: "webload::archive", "No job directory or build number, not archiving");
            return;
        };

        if let Err(e) = record.save(&job_dir) {
            tracing::warn!(target: "webload::archive", "Failed to record build #{}: {:#}", record.number, e);
        }
        let archived = archive_session_files(&job.workspace, session_name, &record.artifact_dir);
        tracing::info!(
            target: "webload::archive",
            "Archived {} file(s) for build #{}",
            archived,
            record.number
        );
    }
}
