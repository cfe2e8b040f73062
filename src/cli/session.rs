//! Run a load session template with the WebLOAD console.
//!
//! ```bash
//! webload-ci session --template load.tpl
//! webload-ci session --template load.tpl --session-file 'ls${BUILD_NUMBER}.ls' --duration 300
//! webload-ci session --template load.tpl --virtual-clients 50 --job-dir /var/ci/jobs/nightly
//! ```
//!
//! The build is unstable when the session does not report `Passed` and
//! failed when the console exits non-zero.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::common::JobArgs;
use crate::steps::ExecuteSessionStep;
use crate::tool::ProcessLauncher;
use crate::validation::parse_duration;

/// Command to run a load session.
#[derive(Args, Debug)]
pub struct SessionCommand {
    /// Load session template to run (`.tpl`)
    #[arg(long, value_name = "TPL")]
    pub template: String,

    /// Session file to write, relative to the workspace [default: template name with `.ls`]
    #[arg(long, value_name = "LS")]
    pub session_file: Option<String>,

    /// Run duration in seconds; empty or 0 runs the template as configured
    #[arg(long, value_name = "SECONDS", value_parser = parse_duration, default_value = "0")]
    pub duration: u64,

    /// Number of virtual clients; 0 keeps the template setting
    #[arg(long, default_value_t = 0, value_name = "N")]
    pub virtual_clients: u64,

    /// Number of probing clients; 0 keeps the template setting
    #[arg(long, default_value_t = 0, value_name = "N")]
    pub probing_clients: u64,

    #[command(flatten)]
    pub job: JobArgs,
}

impl SessionCommand {
    /// The step these options describe.
    #[must_use]
    pub fn step(&self) -> ExecuteSessionStep {
        ExecuteSessionStep {
            template: self.template.clone(),
            session_file: self.session_file.clone(),
            virtual_clients: self.virtual_clients,
            probing_clients: self.probing_clients,
            execution_duration: self.duration,
        }
    }

    pub async fn execute(self, config_path: Option<PathBuf>) -> Result<i32> {
        let job = self.job.job_context(config_path).await?;
        let outcome = self.step().run(&job, &ProcessLauncher).await?;
        self.job.finish(&outcome)
    }
}
