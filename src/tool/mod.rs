//! WebLOAD tool command lines and the process launcher that runs them.

pub mod invocation;
pub mod launcher;

pub use invocation::{InvocationMode, OutputFormat, ReportArgs, SessionArgs, ToolInvocation};
pub use launcher::{Launcher, ProcessLauncher};
