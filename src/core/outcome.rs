//! Step outcomes and build result severities.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::extract::ExtractionResult;
use crate::steps::StepState;
use crate::tool::InvocationMode;

/// Result of a build step, ordered by severity.
///
/// Combining two results keeps the worse one, so a session that passed the
/// process exit code check but reported a non-`Passed` return code ends up
/// [`BuildResult::Unstable`], and a failing exit code always wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildResult {
    /// Everything passed
    Success,
    /// The step ran but the load session did not pass
    Unstable,
    /// The tool exited with a non-zero code
    Failure,
}

impl BuildResult {
    /// Map a process exit code to a result.
    #[must_use]
    pub const fn from_exit_code(code: i32) -> Self {
        if code == 0 { Self::Success } else { Self::Failure }
    }

    /// Combine two results, keeping the more severe one.
    #[must_use]
    pub fn combine(self, other: Self) -> Self {
        self.max(other)
    }
}

impl fmt::Display for BuildResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "SUCCESS"),
            Self::Unstable => write!(f, "UNSTABLE"),
            Self::Failure => write!(f, "FAILURE"),
        }
    }
}

/// What a completed step reports back to the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    /// Which tool mode ran
    pub mode: InvocationMode,
    /// Exit code of the external process
    pub exit_code: i32,
    /// Final result after combining exit code and session return code
    pub result: BuildResult,
    /// Fields scraped from the results file (session mode only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction: Option<ExtractionResult>,
    /// When the step started
    pub started_at: DateTime<Utc>,
    /// When the step finished
    pub finished_at: DateTime<Utc>,
    /// Phases the step went through, ending in [`StepState::Done`]
    pub states: Vec<StepState>,
}
