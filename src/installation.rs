//! Locating the WebLOAD installation.
//!
//! The installation root is chosen from three sources in strict order, first
//! non-empty wins and nothing is merged:
//!
//! 1. `WL_HOME` in the job environment
//! 2. `installation_path` from the [`GlobalConfig`]
//! 3. `{Program Files}\RadView\WebLOAD`, where Program Files is
//!    `ProgramFiles(x86)`, then `ProgramFiles`, then `C:\Program Files`
//!
//! Resolution does no I/O. [`require_executable`] is the existence check the
//! build steps run on the final executable path.

use anyhow::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::GlobalConfig;
use crate::constants::{
    BIN_DIR, DEFAULT_INSTALL_SUFFIX, DEFAULT_PROGRAM_FILES, PROGRAM_FILES_VAR,
    PROGRAM_FILES_X86_VAR, WL_HOME_VAR,
};
use crate::core::WebloadError;

/// Which source supplied the installation root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallSource {
    /// `WL_HOME` environment override
    Environment,
    /// Persisted global configuration
    GlobalConfig,
    /// Guessed from Program Files
    PlatformDefault,
}

/// Inputs to installation root resolution, read once per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSearchConfig {
    /// Value of `WL_HOME`, if present
    pub env_override: Option<String>,
    /// Installation root from the global configuration, if present
    pub global_config_path: Option<String>,
    /// `{Program Files}\RadView\WebLOAD`
    pub platform_default_root: String,
}

impl PathSearchConfig {
    /// Assemble the search inputs from a job environment and the global configuration.
    #[must_use]
    pub fn from_sources(env: &BTreeMap<String, String>, global: &GlobalConfig) -> Self {
        Self {
            env_override: env.get(WL_HOME_VAR).cloned(),
            global_config_path: global.installation_path().map(str::to_string),
            platform_default_root: platform_default_root(env),
        }
    }

    /// Pick the installation root and report where it came from.
    #[must_use]
    pub fn resolve_with_source(&self) -> (String, InstallSource) {
        if let Some(path) = non_empty(self.env_override.as_deref()) {
            return (path.to_string(), InstallSource::Environment);
        }
        if let Some(path) = non_empty(self.global_config_path.as_deref()) {
            return (path.to_string(), InstallSource::GlobalConfig);
        }
        (self.platform_default_root.clone(), InstallSource::PlatformDefault)
    }

    /// Pick the installation root, logging the chosen source.
    #[must_use]
    pub fn resolve(&self) -> String {
        let (path, source) = self.resolve_with_source();
        match source {
            InstallSource::Environment => {
                tracing::info!(target: "webload::install", "Using {}: {}", WL_HOME_VAR, path);
            }
            InstallSource::GlobalConfig => {
                tracing::info!(target: "webload::install", "Using configured installation path: {}", path);
            }
            InstallSource::PlatformDefault => {
                tracing::debug!(target: "webload::install", "Installation path not specified, guessed: {}", path);
            }
        }
        path
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// `{Program Files}\RadView\WebLOAD` for the given environment.
#[must_use]
pub fn platform_default_root(env: &BTreeMap<String, String>) -> String {
    let program_files = non_empty(env.get(PROGRAM_FILES_X86_VAR).map(String::as_str))
        .or_else(|| non_empty(env.get(PROGRAM_FILES_VAR).map(String::as_str)))
        .unwrap_or(DEFAULT_PROGRAM_FILES);
    format!("{program_files}\\{DEFAULT_INSTALL_SUFFIX}")
}

/// `{root}/bin/{name}`.
#[must_use]
pub fn executable_path(root: &str, name: &str) -> PathBuf {
    Path::new(root).join(BIN_DIR).join(name)
}

/// Resolve the executable and fail with [`WebloadError::InstallationNotFound`] if it is absent.
pub fn require_executable(config: &PathSearchConfig, name: &str) -> Result<PathBuf> {
    let path = executable_path(&config.resolve(), name);
    if !path.is_file() {
        return Err(WebloadError::InstallationNotFound {
            path: path.display().to_string(),
        }
        .into());
    }
    Ok(path)
}
