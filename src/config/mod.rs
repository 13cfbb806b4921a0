//! Configuration: the `key = value` boot config and the TOML settings file.
pub mod kv;
pub mod settings;
pub mod validation;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Parsed boot configuration.
///
/// Keys are lowercase; iteration is in sorted key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// File the values were read from (empty for in-memory configs).
    pub path: PathBuf,
    values: BTreeMap<String, String>,
}

impl Config {
    /// Load and parse the config file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if the file does not exist and
    /// [`ConfigError::Io`] if it cannot be read.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            values: kv::parse_from_str(&content),
        })
    }

    /// Build a config from in-memory content.
    #[must_use]
    pub fn from_str_content(content: &str) -> Self {
        Self {
            path: PathBuf::new(),
            values: kv::parse_from_str(content),
        }
    }

    /// Value for `key` (already lowercase), if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// All keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of recognized entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no entries were recognized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
