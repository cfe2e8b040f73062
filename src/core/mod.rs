//! Core types shared by every build step.
//!
//! - [`error`] - [`WebloadError`], [`ErrorContext`] and [`user_friendly_error`]
//! - [`outcome`] - [`BuildResult`] severities and the [`StepOutcome`] report

pub mod error;
pub mod outcome;

pub use error::{ErrorContext, WebloadError, user_friendly_error};
pub use outcome::{BuildResult, StepOutcome};
