//! Global configuration management for webload-ci.
//!
//! The global configuration holds settings that apply to every job run on an
//! agent. Today that is a single value: the WebLOAD installation root used
//! when `WL_HOME` is not set.
//!
//! # Location
//!
//! - **Unix/macOS**: `~/.webload-ci/config.toml`
//! - **Windows**: `%LOCALAPPDATA%\webload-ci\config.toml`
//! - Overridable with the global `--config` option
//!
//! # File Format
//!
//! ```toml
//! installation_path = "D:\\Tools\\RadView\\WebLOAD"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Global configuration persisted between job runs.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct GlobalConfig {
    /// WebLOAD installation root, second in precedence after `WL_HOME`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installation_path: Option<String>,
}

impl GlobalConfig {
    /// Load from a specific file.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read global config from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse global config from {}", path.display()))
    }

    /// Save to a specific file, creating parent directories as needed.
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize global config")?;

        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write global config to {}", path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let mut perms = fs::metadata(path)
                .await
                .with_context(|| format!("Failed to read permissions for {}", path.display()))?
                .permissions();
            perms.set_mode(0o600);
            fs::set_permissions(path, perms).await.with_context(|| {
                format!("Failed to set permissions on {}", path.display())
            })?;
        }

        Ok(())
    }

    /// Default configuration file path for this platform.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("webload-ci")
        } else {
            crate::utils::platform::get_home_dir()?.join(".webload-ci")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// The configured installation root, if set and non-empty.
    #[must_use]
    pub fn installation_path(&self) -> Option<&str> {
        self.installation_path.as_deref().filter(|p| !p.is_empty())
    }

    /// Set the installation root.
    pub fn set_installation_path(&mut self, path: impl Into<String>) {
        self.installation_path = Some(path.into());
    }

    /// Forget the installation root. Returns whether one was set.
    pub fn clear_installation_path(&mut self) -> bool {
        self.installation_path.take().is_some()
    }
}

/// Lazily loads and caches a [`GlobalConfig`] bound to one file.
pub struct GlobalConfigManager {
    config: Option<GlobalConfig>,
    path: PathBuf,
}

impl GlobalConfigManager {
    /// Manager bound to the default configuration path.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config: None,
            path: GlobalConfig::default_path()?,
        })
    }

    /// Manager bound to `path`, or to the default path when `None`.
    pub fn with_optional_path(path: Option<PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Ok(Self::with_path(path)),
            None => Self::new(),
        }
    }

    /// Manager bound to a specific path.
    #[must_use]
    pub const fn with_path(path: PathBuf) -> Self {
        Self {
            config: None,
            path,
        }
    }

    /// Path of the managed file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the configuration, loading it on first access.
    pub async fn get(&mut self) -> Result<&GlobalConfig> {
        Ok(&*self.get_mut().await?)
    }

    /// Get the configuration mutably, loading it on first access.
    pub async fn get_mut(&mut self) -> Result<&mut GlobalConfig> {
        if self.config.is_none() {
            let loaded = if self.path.exists() {
                GlobalConfig::load_from(&self.path).await?
            } else {
                GlobalConfig::default()
            };
            self.config = Some(loaded);
        }

        Ok(self.config.get_or_insert_with(GlobalConfig::default))
    }

    /// Save the cached configuration, if one was loaded.
    pub async fn save(&self) -> Result<()> {
        if let Some(config) = &self.config {
            config.save_to(&self.path).await?;
        }
        Ok(())
    }
}
