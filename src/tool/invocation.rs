//! Command lines for the two WebLOAD tools.
//!
//! A [`ToolInvocation`] is built once per run from the job settings and then
//! handed to a [`Launcher`](super::Launcher). It is immutable: both
//! constructors compute the full argument list up front.
//!
//! # Report mode
//!
//! ```text
//! WLAnalyticsCmd.exe -m U -p <portfolio> -ls <primary> [-ls <compare>]... [-f <FORMAT>] -l <location> [-n <name>]
//! ```
//!
//! # Session mode
//!
//! ```text
//! webload.exe <template> <session> [/vc <n>] [/pc <n>] /ar [<seconds>] /rc <results>
//! ```

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::constants::DEFAULT_PORTFOLIO;
use crate::core::WebloadError;
use crate::utils::platform::path_to_string;

/// Which tool, and so which argument grammar, an invocation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvocationMode {
    /// Run a load session with the console
    ExecuteSession,
    /// Publish an analytics report
    GenerateReport,
}

/// Report output formats understood by the analytics tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "UPPER")]
pub enum OutputFormat {
    Junit,
    Html,
    Doc,
    Odt,
    Xls,
    Xlsx,
    Rtf,
    Pdf,
    Csv,
    Raw,
}

impl OutputFormat {
    /// Name passed after `-f`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Junit => "JUNIT",
            Self::Html => "HTML",
            Self::Doc => "DOC",
            Self::Odt => "ODT",
            Self::Xls => "XLS",
            Self::Xlsx => "XLSX",
            Self::Rtf => "RTF",
            Self::Pdf => "PDF",
            Self::Csv => "CSV",
            Self::Raw => "RAW",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs for a report invocation.
#[derive(Debug, Clone, Default)]
pub struct ReportArgs {
    /// Portfolio name; `Summary Portfolio` when unset or empty
    pub portfolio: Option<String>,
    /// Primary load session
    pub primary_session: PathBuf,
    /// Comparison sessions, in the order they were collected
    pub comparisons: Vec<PathBuf>,
    /// Report format, omitted from the command line when unset
    pub format: Option<OutputFormat>,
    /// Output location; `default_location` when unset or empty
    pub location: Option<String>,
    /// Workspace directory used as the default output location
    pub default_location: PathBuf,
    /// Report name, omitted when unset or empty
    pub report_name: Option<String>,
}

/// Inputs for a session invocation.
#[derive(Debug, Clone, Default)]
pub struct SessionArgs {
    /// Load session template (`.tpl`)
    pub template: String,
    /// Session file the console writes
    pub session_file: PathBuf,
    /// Results file passed to `/rc`
    pub results_file: PathBuf,
    /// Virtual clients, `/vc` when greater than zero
    pub virtual_clients: u64,
    /// Probing clients, `/pc` when greater than zero
    pub probing_clients: u64,
    /// Run duration in seconds, appended to `/ar` when greater than zero
    pub execution_duration: u64,
}

/// A fully built tool command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    executable: PathBuf,
    mode: InvocationMode,
    positional: Vec<String>,
    flags: Vec<(String, Option<String>)>,
}

impl ToolInvocation {
    /// Build the analytics report command line.
    #[must_use]
    pub fn report(executable: impl AsRef<Path>, args: &ReportArgs) -> Self {
        let portfolio = non_empty(args.portfolio.as_deref()).unwrap_or(DEFAULT_PORTFOLIO);
        let mut invocation = Self::new(executable, InvocationMode::GenerateReport)
            .flag_with("-m", "U")
            .flag_with("-p", portfolio)
            .flag_with("-ls", path_to_string(&args.primary_session));

        for session in &args.comparisons {
            invocation = invocation.flag_with("-ls", path_to_string(session));
        }

        if let Some(format) = args.format {
            invocation = invocation.flag_with("-f", format.as_str());
        }

        let location = non_empty(args.location.as_deref())
            .map_or_else(|| path_to_string(&args.default_location), str::to_string);
        invocation = invocation.flag_with("-l", location);

        if let Some(name) = non_empty(args.report_name.as_deref()) {
            invocation = invocation.flag_with("-n", name);
        }

        invocation
    }

    /// Build the console session command line.
    ///
    /// Fails with [`WebloadError::ConfigError`] when no template is given.
    pub fn session(executable: impl AsRef<Path>, args: &SessionArgs) -> Result<Self> {
        if args.template.is_empty() {
            return Err(WebloadError::ConfigError {
                message: "Template file not specified".to_string(),
            }
            .into());
        }

        let mut invocation = Self::new(executable, InvocationMode::ExecuteSession)
            .positional(args.template.clone())
            .positional(path_to_string(&args.session_file));

        if args.virtual_clients > 0 {
            invocation = invocation.flag_with("/vc", args.virtual_clients.to_string());
        }
        if args.probing_clients > 0 {
            invocation = invocation.flag_with("/pc", args.probing_clients.to_string());
        }
        invocation = if args.execution_duration > 0 {
            invocation.flag_with("/ar", args.execution_duration.to_string())
        } else {
            invocation.flag("/ar")
        };

        Ok(invocation.flag_with("/rc", path_to_string(&args.results_file)))
    }

    fn new(executable: impl AsRef<Path>, mode: InvocationMode) -> Self {
        Self {
            executable: executable.as_ref().to_path_buf(),
            mode,
            positional: Vec::new(),
            flags: Vec::new(),
        }
    }

    fn positional(mut self, arg: impl Into<String>) -> Self {
        self.positional.push(arg.into());
        self
    }

    fn flag(mut self, name: impl Into<String>) -> Self {
        self.flags.push((name.into(), None));
        self
    }

    fn flag_with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.flags.push((name.into(), Some(value.into())));
        self
    }

    /// Executable to launch.
    #[must_use]
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Tool mode.
    #[must_use]
    pub const fn mode(&self) -> InvocationMode {
        self.mode
    }

    /// Positional arguments following the executable.
    #[must_use]
    pub fn positional_args(&self) -> &[String] {
        &self.positional
    }

    /// Flags and their optional values, in command line order.
    #[must_use]
    pub fn flag_args(&self) -> &[(String, Option<String>)] {
        &self.flags
    }

    /// Arguments after the executable, flattened in order.
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        let mut args = self.positional.clone();
        for (name, value) in &self.flags {
            args.push(name.clone());
            if let Some(value) = value {
                args.push(value.clone());
            }
        }
        args
    }

    /// The executable followed by [`args`](Self::args).
    #[must_use]
    pub fn argv(&self) -> Vec<String> {
        let mut argv = vec![path_to_string(&self.executable)];
        argv.extend(self.args());
        argv
    }

    /// Command line for logs, quoting arguments that contain spaces.
    #[must_use]
    pub fn to_display_string(&self) -> String {
        self.argv()
            .iter()
            .map(|arg| {
                if arg.is_empty() || arg.contains(char::is_whitespace) {
                    format!("\"{arg}\"")
                } else {
                    arg.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
