//! Supplicant configuration file resource.
use std::path::{Path, PathBuf};

use anyhow::Result;

use super::{Resource, ResourceChange, ResourceState, file};

/// Supplicant control socket directory and group.
pub const CTRL_INTERFACE: &str = "ctrl_interface=DIR=/var/run/wpa_supplicant GROUP=netdev";

/// Wrap a `network={...}` block with the fixed supplicant boilerplate.
///
/// The header names the boot config the file is generated from.
#[must_use]
pub fn render(config_path: &Path, network_block: &str) -> String {
    let mut out = format!(
        "{CTRL_INTERFACE}\n# managed by bootconfig from {}\nupdate_config=1\n\n{network_block}",
        config_path.display()
    );
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// The supplicant config file, written with backup-on-first-write.
#[derive(Debug, Clone)]
pub struct WpaConfigResource {
    /// Supplicant config path.
    pub path: PathBuf,
    /// Backup sibling, created on the first overwrite only.
    pub backup: PathBuf,
    /// Full desired file content.
    pub content: String,
}

impl WpaConfigResource {
    /// Create a new supplicant config resource.
    #[must_use]
    pub const fn new(path: PathBuf, backup: PathBuf, content: String) -> Self {
        Self {
            path,
            backup,
            content,
        }
    }
}

impl Resource for WpaConfigResource {
    fn description(&self) -> String {
        self.path.display().to_string()
    }

    fn current_state(&self) -> Result<ResourceState> {
        Ok(match file::read_optional(&self.path)? {
            None => ResourceState::Missing,
            Some(current) if current == self.content => ResourceState::Correct,
            Some(_) => ResourceState::Incorrect {
                current: "content differs".to_string(),
            },
        })
    }

    fn apply(&self) -> Result<ResourceChange> {
        file::write(&self.path, &self.content, Some(&self.backup))?;
        Ok(ResourceChange::Applied)
    }
}
