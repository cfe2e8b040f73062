//! Error handling for webload-ci
//!
//! Two layers, as everywhere in this crate:
//! 1. [`WebloadError`] - strongly typed failure cases raised by the build steps
//! 2. [`ErrorContext`] - the same error dressed up with details and an
//!    actionable suggestion for the person reading the CI log
//!
//! Application code returns [`anyhow::Result`] and attaches context with
//! [`anyhow::Context`]. At the top of the process, [`user_friendly_error`]
//! recognises the typed errors inside the chain and turns them into an
//! [`ErrorContext`] which `main` prints before exiting.
//!
//! # Fatal error kinds
//!
//! - [`WebloadError::InstallationNotFound`] - the tool executable is absent at the resolved path
//! - [`WebloadError::ConfigError`] - a required field is missing or invalid
//! - [`WebloadError::SessionFileMissing`] - an input or output load session file is absent
//! - [`WebloadError::ResultsFileMissing`] - the console never wrote its results file
//!
//! None of them are retried. Archival I/O problems never surface as errors;
//! see [`crate::archive`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use webload_ci::core::{WebloadError, ErrorContext, user_friendly_error};
//!
//! let error = WebloadError::InstallationNotFound {
//!     path: "C:\\Program Files\\RadView\\WebLOAD\\bin\\webload.exe".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for webload-ci operations.
///
/// Each variant names one failure mode of a build step and carries the path
/// or message needed to explain it.
#[derive(Error, Debug, Clone)]
pub enum WebloadError {
    /// The tool executable does not exist at the resolved installation path.
    ///
    /// # Fields
    /// - `path`: Full path of the executable that was looked up
    #[error("Can't find installation at {path}")]
    InstallationNotFound {
        /// Full path of the executable that was looked up
        path: String,
    },

    /// A required job field is missing or invalid.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },

    /// An expected load session file is absent.
    ///
    /// Raised before launch when the primary session of a report is missing,
    /// and after launch when the console did not produce its session file.
    #[error("Load session file not found: {path}")]
    SessionFileMissing {
        /// Path of the missing session file
        path: String,
    },

    /// The console exited without writing its results file.
    #[error("WebLOAD session ended unexpectedly, results file not created: {path}")]
    ResultsFileMissing {
        /// Path where the results file was expected
        path: String,
    },

    /// File system operation failed
    #[error("File system error: {operation}")]
    FileSystemError {
        /// Description of the file system operation that failed
        operation: String,
        /// Path where the error occurred
        path: String,
    },

    /// Generic error for cases not covered by specific variants
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

/// Error context wrapper that provides user-friendly error information.
///
/// When displayed, errors show:
/// 1. **Error**: The main error message in red
/// 2. **Details**: Additional context in yellow (optional)
/// 3. **Suggestion**: Actionable steps in green (optional)
///
/// ```rust,no_run
/// use webload_ci::core::{WebloadError, ErrorContext};
///
/// let context = ErrorContext::new(WebloadError::ConfigError {
///     message: "Template file not specified".to_string(),
/// })
/// .with_suggestion("Pass --template <file.tpl>");
///
/// println!("{}", context);
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: WebloadError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context without suggestion or details.
    #[must_use]
    pub const fn new(error: WebloadError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error context to stderr with terminal colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`].
///
/// Recognises, in order: an [`ErrorContext`] already in the chain, a
/// [`WebloadError`] anywhere in the chain, [`std::io::Error`] kinds and TOML
/// parse errors. Anything else becomes [`WebloadError::Other`] carrying the
/// full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    for cause in error.chain() {
        if let Some(ctx) = cause.downcast_ref::<ErrorContext>() {
            return ErrorContext {
                error: ctx.error.clone(),
                suggestion: ctx.suggestion.clone(),
                details: ctx.details.clone(),
            };
        }
        if let Some(webload_error) = cause.downcast_ref::<WebloadError>() {
            return create_error_context(webload_error.clone());
        }
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(WebloadError::FileSystemError {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                })
                .with_suggestion("Check that the CI agent account can read the workspace and the WebLOAD installation")
                .with_details("The operating system refused access to a file");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(WebloadError::FileSystemError {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct")
                .with_details("A required file or directory cannot be found");
            }
            _ => {}
        }
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(WebloadError::ConfigError {
            message: toml_error.to_string(),
        })
        .with_suggestion("Check the TOML syntax of the configuration or build record file");
    }

    let mut message = error.to_string();
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(WebloadError::Other {
        message,
    })
}

fn create_error_context(error: WebloadError) -> ErrorContext {
    match &error {
        WebloadError::InstallationNotFound { path } => ErrorContext::new(error.clone())
            .with_suggestion(format!(
                "Set {} to the WebLOAD installation root, or run 'webload-ci config set-install-path <dir>'",
                crate::constants::WL_HOME_VAR
            ))
            .with_details(format!(
                "The executable {path} does not exist. The installation root is taken from WL_HOME, then the global configuration, then Program Files"
            )),

        WebloadError::ConfigError { .. } => ErrorContext::new(error.clone())
            .with_suggestion("Run the command with --help to see the required options"),

        WebloadError::SessionFileMissing { path } => ErrorContext::new(error.clone())
            .with_suggestion("Check the session file name and the --workspace directory")
            .with_details(format!("Expected load session file at {path}")),

        WebloadError::ResultsFileMissing { .. } => ErrorContext::new(error.clone())
            .with_suggestion("Inspect the WebLOAD console output above; the session most likely aborted before completion")
            .with_details("The console writes the results file when started with /rc and a session finishes"),

        _ => ErrorContext::new(error.clone()),
    }
}
