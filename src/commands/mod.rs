//! Top-level command orchestration.
pub mod apply;

use anyhow::Result;

use crate::cli::{Cli, VERSION};
use crate::config::Config;
use crate::config::settings::Settings;
use crate::logging::Logger;

/// Shared state produced by the common command setup sequence.
#[derive(Debug)]
pub struct CommandSetup {
    /// Locations of the system files.
    pub settings: Settings,
    /// Parsed boot config.
    pub config: Config,
}

impl CommandSetup {
    /// Load the settings, then the boot config they (or `--config`) point at.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`](crate::error::ConfigError::NotFound)
    /// when the boot config does not exist, and other
    /// [`ConfigError`](crate::error::ConfigError)s for unreadable or invalid
    /// files.
    pub fn init(cli: &Cli, log: &Logger) -> Result<Self> {
        log.debug(&format!("bootconfig {VERSION}"));

        let settings = Settings::load(cli.settings.as_deref())?;
        log.debug(&format!("settings root: {}", settings.root.display()));

        let config_path = cli
            .config
            .clone()
            .unwrap_or_else(|| settings.config_path());
        let config = Config::load(&config_path)?;
        log.debug(&format!(
            "loaded {} keys from {}",
            config.len(),
            config_path.display()
        ));

        Ok(Self { settings, config })
    }
}
