//! Persisted hostname file resource.
use std::path::PathBuf;

use anyhow::Result;

use super::{Resource, ResourceChange, ResourceState, compare, file};

/// The persisted hostname file (`/etc/hostname`).
#[derive(Debug, Clone)]
pub struct HostnameFileResource {
    /// Path of the hostname file.
    pub path: PathBuf,
    /// Desired hostname.
    pub hostname: String,
}

impl HostnameFileResource {
    /// Create a new hostname file resource.
    #[must_use]
    pub fn new(path: PathBuf, hostname: &str) -> Self {
        Self {
            path,
            hostname: hostname.to_string(),
        }
    }
}

impl Resource for HostnameFileResource {
    fn description(&self) -> String {
        self.path.display().to_string()
    }

    fn current_state(&self) -> Result<ResourceState> {
        Ok(file::read_optional(&self.path)?
            .map_or(ResourceState::Missing, |c| compare(&c, &self.hostname)))
    }

    fn apply(&self) -> Result<ResourceChange> {
        file::write(&self.path, &format!("{}\n", self.hostname), None)?;
        Ok(ResourceChange::Applied)
    }
}
