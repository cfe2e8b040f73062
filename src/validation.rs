//! Sanity checks for job settings.
//!
//! These mirror the hints a job author sees while configuring the step: an
//! empty template is an error, an unexpected extension only a warning. The
//! build steps log warnings and carry on; only errors stop a run.

use std::fmt;

use crate::constants::{SESSION_EXTENSION, TEMPLATE_EXTENSION};

/// Outcome of checking one setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldCheck {
    Ok,
    Warning(String),
    Error(String),
}

impl FieldCheck {
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Log warnings and errors for the named setting. Returns `self` for chaining.
    pub fn log(self, field: &str) -> Self {
        match &self {
            Self::Ok => {}
            Self::Warning(message) => {
                tracing::warn!(target: "webload::step", "{}: {}", field, message);
            }
            Self::Error(message) => {
                tracing::error!(target: "webload::step", "{}: {}", field, message);
            }
        }
        self
    }
}

impl fmt::Display for FieldCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => f.write_str("ok"),
            Self::Warning(message) => write!(f, "warning: {message}"),
            Self::Error(message) => write!(f, "error: {message}"),
        }
    }
}

/// A load session template must be given and should end in `.tpl`.
#[must_use]
pub fn check_template(value: &str) -> FieldCheck {
    if value.is_empty() {
        return FieldCheck::Error("Please select a template file".to_string());
    }
    if !has_extension(value, TEMPLATE_EXTENSION) {
        return FieldCheck::Warning(format!(
            "File extension is not {TEMPLATE_EXTENSION}, is this the right file?"
        ));
    }
    FieldCheck::Ok
}

/// A load session must be given and should end in `.ls`.
#[must_use]
pub fn check_session_file(value: &str) -> FieldCheck {
    if value.is_empty() {
        return FieldCheck::Error("Please select a load session file".to_string());
    }
    if !has_extension(value, SESSION_EXTENSION) {
        return FieldCheck::Warning(format!(
            "File extension is not .{SESSION_EXTENSION}, is this the right file?"
        ));
    }
    FieldCheck::Ok
}

/// Parse a duration in seconds. Empty means no duration.
///
/// Usable as a clap value parser.
pub fn parse_duration(value: &str) -> Result<u64, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse::<u64>()
        .map_err(|_| format!("'{value}' is not a number of seconds"))
}

fn has_extension(value: &str, extension: &str) -> bool {
    value
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ext == extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_checks() {
        assert!(check_template("").is_error());
        assert_eq!(check_template("load.tpl"), FieldCheck::Ok);
        assert!(matches!(check_template("load.ls"), FieldCheck::Warning(_)));
        assert!(matches!(check_template("tpl"), FieldCheck::Warning(_)));
    }

    #[test]
    fn test_session_file_checks() {
        assert!(check_session_file("").is_error());
        assert_eq!(check_session_file("ls${BUILD_NUMBER}.ls"), FieldCheck::Ok);
        assert!(matches!(check_session_file("demo.dat"), FieldCheck::Warning(_)));
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration(""), Ok(0));
        assert_eq!(parse_duration("300"), Ok(300));
        assert_eq!(parse_duration(" 60 "), Ok(60));
        assert!(parse_duration("5m").is_err());
        assert!(parse_duration("-1").is_err());
    }

    #[test]
    fn test_log_returns_check() {
        let check = check_template("x.txt").log("template");
        assert!(!check.is_error());
        assert!(check.to_string().starts_with("warning:"));
    }
}
