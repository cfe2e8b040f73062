//! Platform-specific utilities and file name helpers
//!
//! The build steps run on Windows agents in production but are developed and
//! tested on Unix too, so the helpers here avoid depending on the host's
//! notion of paths where the tool's conventions matter:
//!
//! - Job variable expansion (`$VAR` / `${VAR}`) against an explicit environment
//! - Reading the process environment without tripping over non-Unicode entries
//! - Extension substitution for session file families
//! - Absolute-name detection that understands drive letters on every host
//! - Forward-slash normalization for archive entries
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::collections::BTreeMap;
//! use webload_ci::utils::platform::{expand_vars, replace_extension};
//!
//! let mut env = BTreeMap::new();
//! env.insert("BUILD_NUMBER".to_string(), "7".to_string());
//!
//! assert_eq!(expand_vars("ls${BUILD_NUMBER}.ls", &env), "ls7.ls");
//! assert_eq!(replace_extension("demo.tpl", "ls"), "demo.ls");
//! ```

use anyhow::Result;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Gets the home directory path for the current user.
pub fn get_home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| {
        anyhow::anyhow!(
            "Could not determine home directory.\n\n\
            Set HOME (Unix) or USERPROFILE (Windows), or pass --config explicitly"
        )
    })
}

/// The process environment as a job environment.
#[must_use]
pub fn process_env() -> BTreeMap<String, String> {
    collect_env(std::env::vars_os())
}

/// Collect `(name, value)` pairs, skipping entries that are not valid Unicode.
#[must_use]
pub fn collect_env<I>(vars: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter()
        .filter_map(|(name, value)| match (name.into_string(), value.into_string()) {
            (Ok(name), Ok(value)) => Some((name, value)),
            (Ok(name), Err(_)) => {
                tracing::debug!("Ignoring environment variable {} with a non-Unicode value", name);
                None
            }
            (Err(name), _) => {
                tracing::debug!("Ignoring environment variable {}", name.to_string_lossy());
                None
            }
        })
        .collect()
}

/// Expand `$VAR` and `${VAR}` references against a job environment.
///
/// Unknown variables are left intact, so `"${MISSING}.ls"` stays as written.
/// Lookups never touch the process environment; callers pass the merged job
/// environment explicitly.
#[must_use]
pub fn expand_vars(input: &str, env: &BTreeMap<String, String>) -> String {
    shellexpand::env_with_context_no_errors(input, |name| env.get(name)).into_owned()
}

/// Replace the extension of a file name, or append one.
///
/// The name is cut at the last `.` when that dot is not the first character;
/// otherwise `.{extension}` is appended.
///
/// ```rust,no_run
/// use webload_ci::utils::platform::replace_extension;
///
/// assert_eq!(replace_extension("my.ls", "ls"), "my.ls");
/// assert_eq!(replace_extension("my", "ls"), "my.ls");
/// assert_eq!(replace_extension("my.tpl", "ls"), "my.ls");
/// ```
#[must_use]
pub fn replace_extension(name: &str, extension: &str) -> String {
    match name.rfind('.') {
        Some(idx) if idx > 0 => format!("{}.{extension}", &name[..idx]),
        _ => format!("{name}.{extension}"),
    }
}

/// Whether a file name is absolute on either Unix or Windows.
///
/// Recognises `/x`, `\x`, `\\server\share` and `C:\x` / `C:/x` regardless of
/// the host platform.
#[must_use]
pub fn is_absolute_name(name: &str) -> bool {
    if Path::new(name).is_absolute() || name.starts_with('/') || name.starts_with('\\') {
        return true;
    }
    let bytes = name.as_bytes();
    bytes.len() > 2
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes[2] == b'\\' || bytes[2] == b'/')
}

/// Normalize path separators to forward slashes.
///
/// Archive entries are stored with forward slashes on every platform.
#[must_use]
pub fn normalize_path_for_storage<P: AsRef<Path>>(path: P) -> String {
    path.as_ref().to_string_lossy().replace('\\', "/")
}

/// Render a path for logging and command lines.
#[must_use]
pub fn path_to_string(path: &Path) -> String {
    path.display().to_string()
}
