//! Scraping values out of the console results file.
//!
//! Results files written by older consoles are not well-formed XML, so they
//! are scanned as text. [`extract_value`] pulls out whatever sits between a
//! prefix marker and a suffix marker; [`ExtractionResult::parse`] applies it
//! to the two attributes the build step cares about.
//!
//! Markers are literals. Matching is greedy and line-bound: on the matching
//! line the value runs to the *last* occurrence of the suffix.
//!
//! ```rust,no_run
//! use webload_ci::extract::{extract_value, ExtractionResult};
//!
//! assert_eq!(extract_value("hello", "there", "chello123therec").as_deref(), Some("123"));
//!
//! let result = ExtractionResult::parse("<el SessionReturnCode=\"Passed\"/>");
//! assert!(result.is_passed());
//! ```

use regex::Regex;
use serde::Serialize;

use crate::constants::PASSED_RETURN_CODE;

const SESSION_RETURN_CODE_PREFIX: &str = "SessionReturnCode=\"";
const ERROR_DESCRIPTION_PREFIX: &str = "ErrorDescription=\"";
const ATTRIBUTE_SUFFIX: &str = "\"";

/// Return the text between `prefix` and `suffix` in the first matching line.
///
/// Returns `None` when nothing matches.
#[must_use]
pub fn extract_value(prefix: &str, suffix: &str, text: &str) -> Option<String> {
    let pattern = format!("({})(.*)({})", regex::escape(prefix), regex::escape(suffix));
    let re = Regex::new(&pattern).ok()?;
    let captures = re.captures(text)?;
    captures.get(2).map(|m| m.as_str().to_string())
}

/// Fields scraped from a results file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    /// Value of `SessionReturnCode`
    pub session_return_code: Option<String>,
    /// Value of `ErrorDescription`
    pub error_description: Option<String>,
}

impl ExtractionResult {
    /// Extract both fields from the results text.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self {
            session_return_code: extract_value(SESSION_RETURN_CODE_PREFIX, ATTRIBUTE_SUFFIX, text),
            error_description: extract_value(ERROR_DESCRIPTION_PREFIX, ATTRIBUTE_SUFFIX, text),
        }
    }

    /// Whether the session return code is `Passed`, ignoring case.
    #[must_use]
    pub fn is_passed(&self) -> bool {
        self.session_return_code
            .as_deref()
            .is_some_and(|code| code.eq_ignore_ascii_case(PASSED_RETURN_CODE))
    }
}
