//! Manage the global webload-ci configuration.
//!
//! The global configuration holds agent-wide settings, today the WebLOAD
//! installation root used when `WL_HOME` is not set.
//!
//! # Examples
//!
//! ```bash
//! webload-ci config                 # same as `config show`
//! webload-ci config path
//! webload-ci config init
//! webload-ci config set-install-path 'D:\Tools\RadView\WebLOAD'
//! webload-ci config clear-install-path
//! webload-ci --config ./agent.toml config show
//! ```

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::config::{GlobalConfig, GlobalConfigManager};
use crate::constants::WL_HOME_VAR;
use crate::installation::{InstallSource, PathSearchConfig};

/// Command to manage the global configuration.
#[derive(Args, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    command: Option<ConfigSubcommands>,
}

#[derive(Subcommand, Debug)]
enum ConfigSubcommands {
    /// Show the configuration and the installation path it resolves to
    Show,

    /// Print the configuration file location
    Path,

    /// Create an empty configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Persist the WebLOAD installation root
    SetInstallPath {
        /// Installation root containing `bin\webload.exe`
        path: String,
    },

    /// Forget the persisted installation root
    ClearInstallPath,
}

impl ConfigCommand {
    pub async fn execute(self, config_path: Option<PathBuf>) -> Result<i32> {
        let mut manager = GlobalConfigManager::with_optional_path(config_path)?;
        match self.command {
            Some(ConfigSubcommands::Show) | None => Self::show(&mut manager).await?,
            Some(ConfigSubcommands::Path) => Self::show_path(manager.path()),
            Some(ConfigSubcommands::Init {
                force,
            }) => Self::init(manager.path(), force).await?,
            Some(ConfigSubcommands::SetInstallPath {
                path,
            }) => Self::set_install_path(&mut manager, path).await?,
            Some(ConfigSubcommands::ClearInstallPath) => Self::clear_install_path(&mut manager).await?,
        }
        Ok(0)
    }

    async fn show(manager: &mut GlobalConfigManager) -> Result<()> {
        let path = manager.path().to_path_buf();
        let config = manager.get().await?.clone();

        println!("{} {}", "Config file:".bold(), path.display());
        if !path.exists() {
            println!("  {}", "(not created yet, using defaults)".dimmed());
        }
        match config.installation_path() {
            Some(install) => println!("{} {}", "installation_path:".bold(), install),
            None => println!("{} {}", "installation_path:".bold(), "(not set)".dimmed()),
        }

        let env = crate::utils::process_env();
        let (resolved, source) = PathSearchConfig::from_sources(&env, &config).resolve_with_source();
        let source = match source {
            InstallSource::Environment => WL_HOME_VAR.to_string(),
            InstallSource::GlobalConfig => "global config".to_string(),
            InstallSource::PlatformDefault => "platform default".to_string(),
        };
        println!("{} {} ({})", "Resolved installation:".bold(), resolved, source.dimmed());
        Ok(())
    }

    fn show_path(path: &Path) {
        println!("{}", path.display());
    }

    async fn init(path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            println!("{} Global config already exists at: {}", "!".yellow(), path.display());
            println!("   Use --force to overwrite");
            return Ok(());
        }

        GlobalConfig::default().save_to(path).await?;
        println!("{} Created global config at: {}", "✓".green(), path.display());
        println!("\n{}", "Next steps:".yellow());
        println!("  webload-ci config set-install-path <WebLOAD installation root>");
        Ok(())
    }

    async fn set_install_path(manager: &mut GlobalConfigManager, path: String) -> Result<()> {
        manager.get_mut().await?.set_installation_path(path.clone());
        manager.save().await?;
        println!("{} Installation path set to: {}", "✓".green(), path);
        Ok(())
    }

    async fn clear_install_path(manager: &mut GlobalConfigManager) -> Result<()> {
        if manager.get_mut().await?.clear_installation_path() {
            manager.save().await?;
            println!("{} Installation path cleared", "✓".green());
        } else {
            println!("Installation path was not set");
        }
        Ok(())
    }
}
