//! Options shared by the build step commands.
//!
//! Both `session` and `report` run inside a CI job: a workspace, the job's
//! environment plus build variables, and optionally a job directory holding
//! previous builds. [`JobArgs`] collects those settings and turns them into a
//! [`JobContext`]; it also owns how a finished step is reported and which
//! exit code the process ends with.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::config::GlobalConfigManager;
use crate::constants::BUILD_NUMBER_VAR;
use crate::core::{BuildResult, StepOutcome};
use crate::steps::JobContext;

/// How a finished step is reported on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputMode {
    /// One human readable summary line
    #[default]
    Text,
    /// The step outcome as a JSON object
    Json,
}

/// Job settings shared by `session` and `report`.
#[derive(Args, Debug, Clone, Default)]
pub struct JobArgs {
    /// Workspace directory of the job [default: current directory]
    #[arg(long, env = "WORKSPACE", value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    /// Build variable, available to `${VAR}` expansion and the tool (repeatable)
    #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_var)]
    pub vars: Vec<(String, String)>,

    /// Directory holding the job's build records and archives
    #[arg(long, env = "WEBLOAD_CI_JOB_DIR", value_name = "DIR")]
    pub job_dir: Option<PathBuf>,

    /// Number of the running build
    #[arg(long, env = "BUILD_NUMBER", value_name = "N")]
    pub build_number: Option<u64>,

    /// Output format for the step summary
    #[arg(long, value_enum, default_value_t = OutputMode::Text)]
    pub output_format: OutputMode,

    /// Exit code used when the build ends unstable
    #[arg(long, default_value_t = 0, value_name = "CODE")]
    pub unstable_exit_code: i32,
}

impl JobArgs {
    /// Build the job context from the process environment and the global
    /// configuration at `config_path` (or its default location).
    pub async fn job_context(&self, config_path: Option<PathBuf>) -> Result<JobContext> {
        let mut manager = GlobalConfigManager::with_optional_path(config_path)?;
        let global = manager.get().await?.clone();
        self.job_context_with(crate::utils::process_env(), global)
    }

    /// Build the job context from an explicit process environment.
    ///
    /// Build variables override process variables, and `--build-number`
    /// overrides both for `BUILD_NUMBER`.
    pub fn job_context_with(
        &self,
        process_env: BTreeMap<String, String>,
        global: crate::config::GlobalConfig,
    ) -> Result<JobContext> {
        let workspace = match &self.workspace {
            Some(dir) => std::path::absolute(dir)
                .with_context(|| format!("Invalid workspace path: {}", dir.display()))?,
            None => std::env::current_dir().context("Failed to determine current directory")?,
        };

        let build_vars: BTreeMap<String, String> = self.vars.iter().cloned().collect();
        let mut env = process_env;
        env.extend(build_vars.iter().map(|(k, v)| (k.clone(), v.clone())));
        if let Some(number) = self.build_number {
            env.insert(BUILD_NUMBER_VAR.to_string(), number.to_string());
        }

        tracing::debug!("Workspace: {}", workspace.display());
        if let Some(dir) = &self.job_dir {
            tracing::debug!("Job directory: {}", dir.display());
        }

        Ok(JobContext {
            workspace,
            env,
            build_vars,
            global,
            job_dir: self.job_dir.clone(),
            build_number: self.build_number,
        })
    }

    /// Print the outcome and return the process exit code.
    pub fn finish(&self, outcome: &StepOutcome) -> Result<i32> {
        match self.output_format {
            OutputMode::Text => println!("{}", summary_line(outcome)),
            OutputMode::Json => {
                println!("{}", serde_json::to_string(outcome).context("Failed to serialize outcome")?);
            }
        }
        Ok(exit_code_for(outcome.result, self.unstable_exit_code))
    }
}

/// Process exit code for a build result.
#[must_use]
pub const fn exit_code_for(result: BuildResult, unstable_exit_code: i32) -> i32 {
    match result {
        BuildResult::Success => 0,
        BuildResult::Unstable => unstable_exit_code,
        BuildResult::Failure => 1,
    }
}

fn summary_line(outcome: &StepOutcome) -> String {
    let result = match outcome.result {
        BuildResult::Success => outcome.result.to_string().green(),
        BuildResult::Unstable => outcome.result.to_string().yellow(),
        BuildResult::Failure => outcome.result.to_string().red(),
    };
    let elapsed = (outcome.finished_at - outcome.started_at).num_milliseconds() as f64 / 1000.0;
    format!("Build step finished: {} (exit code {}, {:.1}s)", result.bold(), outcome.exit_code, elapsed)
}

/// Parse a `KEY=VALUE` build variable.
pub fn parse_var(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no `=` found in `{raw}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("invalid KEY=VALUE: empty key in `{raw}`"));
    }
    Ok((key.to_string(), value.to_string()))
}
