//! Progress of a build step through its phases.

use serde::Serialize;
use std::fmt;

use crate::tool::InvocationMode;

/// Phase a build step is in.
///
/// Session steps go through every phase; report steps skip
/// `AwaitResultsFile`, `ParseResults` and `Archive`. `Failed` can follow any
/// phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepState {
    ResolvePath,
    ValidateInputs,
    BuildArgs,
    Launch,
    AwaitResultsFile,
    ParseResults,
    Archive,
    Done,
    Failed,
}

impl StepState {
    /// Whether the step has stopped.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for StepState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ResolvePath => "resolve-path",
            Self::ValidateInputs => "validate-inputs",
            Self::BuildArgs => "build-args",
            Self::Launch => "launch",
            Self::AwaitResultsFile => "await-results-file",
            Self::ParseResults => "parse-results",
            Self::Archive => "archive",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Records the phases one step run passes through.
#[derive(Debug, Clone)]
pub struct StepTracker {
    mode: InvocationMode,
    visited: Vec<StepState>,
}

impl StepTracker {
    /// A tracker starting in [`StepState::ResolvePath`].
    #[must_use]
    pub fn new(mode: InvocationMode) -> Self {
        tracing::debug!(target: "webload::step", "{:?}: entering {}", mode, StepState::ResolvePath);
        Self {
            mode,
            visited: vec![StepState::ResolvePath],
        }
    }

    /// Current phase.
    #[must_use]
    pub fn current(&self) -> StepState {
        self.visited.last().copied().unwrap_or(StepState::ResolvePath)
    }

    /// Every phase entered so far, in order.
    #[must_use]
    pub fn visited(&self) -> &[StepState] {
        &self.visited
    }

    /// Move to `next`. Ignored once the step has stopped.
    pub fn advance(&mut self, next: StepState) {
        let current = self.current();
        if current.is_terminal() {
            return;
        }
        tracing::debug!(target: "webload::step", "{:?}: {} -> {}", self.mode, current, next);
        self.visited.push(next);
    }

    /// Move to [`StepState::Failed`], recording why.
    pub fn fail(&mut self, error: &anyhow::Error) {
        let current = self.current();
        if current.is_terminal() {
            return;
        }
        tracing::debug!(target: "webload::step", "{:?}: {} failed: {:#}", self.mode, current, error);
        self.visited.push(StepState::Failed);
    }
}
