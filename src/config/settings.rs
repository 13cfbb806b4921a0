//! Optional TOML settings locating the system files the handlers touch.
//!
//! ```toml
//! root = "/"
//! config_file = "/boot/bootconfig.txt"
//! hostname_file = "/etc/hostname"
//! hosts_file = "/etc/hosts"
//! wpa_supplicant_conf = "/etc/wpa_supplicant/wpa_supplicant.conf"
//! service_marker = "/run/systemd/system"
//! version_file = "/etc/debian_version"
//! selftest_packages = ["avahi-daemon", "wpasupplicant"]
//! ```
//!
//! Every path except `root` is resolved under `root`.
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Settings file read when `--settings` is not given; skipped when absent.
pub const DEFAULT_SETTINGS_PATH: &str = "/etc/bootconfig/settings.toml";

/// Suffix appended to a file name to form its backup sibling.
pub const BACKUP_SUFFIX: &str = ".backup";

/// Locations of the files and markers the handlers work with.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Prefix applied to every other path.
    pub root: PathBuf,
    /// The `key = value` boot config.
    pub config_file: PathBuf,
    /// Persisted hostname.
    pub hostname_file: PathBuf,
    /// Static host table.
    pub hosts_file: PathBuf,
    /// Supplicant configuration written by the wifi handler.
    pub wpa_supplicant_conf: PathBuf,
    /// Present when the service manager is running; gates service restarts.
    pub service_marker: PathBuf,
    /// Distribution version reported by selftest.
    pub version_file: PathBuf,
    /// Packages whose install status selftest reports.
    pub selftest_packages: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("/"),
            config_file: PathBuf::from("/boot/bootconfig.txt"),
            hostname_file: PathBuf::from("/etc/hostname"),
            hosts_file: PathBuf::from("/etc/hosts"),
            wpa_supplicant_conf: PathBuf::from("/etc/wpa_supplicant/wpa_supplicant.conf"),
            service_marker: PathBuf::from("/run/systemd/system"),
            version_file: PathBuf::from("/etc/debian_version"),
            selftest_packages: vec!["avahi-daemon".to_string(), "wpasupplicant".to_string()],
        }
    }
}

impl Settings {
    /// Default settings rooted at `root` instead of `/`.
    #[must_use]
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Load settings.
    ///
    /// With an explicit `path` the file must exist. Without one,
    /// [`DEFAULT_SETTINGS_PATH`] is used if present and defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Settings`] for a missing explicit file or one
    /// that does not parse, and [`ConfigError::Io`] if it cannot be read.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) if !p.exists() => {
                return Err(ConfigError::Settings {
                    path: p.to_path_buf(),
                    message: "file not found".to_string(),
                });
            }
            Some(p) => p,
            None => {
                let default = Path::new(DEFAULT_SETTINGS_PATH);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|message| ConfigError::Settings {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Parse settings from TOML text; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns the parser message if the content is not valid settings TOML.
    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.message().to_string())
    }

    /// Resolve `path` under [`root`](Self::root).
    #[must_use]
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path.strip_prefix("/").unwrap_or(path))
    }

    /// Resolved boot config path.
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.resolve(&self.config_file)
    }

    /// Resolved hostname file.
    #[must_use]
    pub fn hostname_path(&self) -> PathBuf {
        self.resolve(&self.hostname_file)
    }

    /// Resolved hosts file.
    #[must_use]
    pub fn hosts_path(&self) -> PathBuf {
        self.resolve(&self.hosts_file)
    }

    /// Resolved supplicant config.
    #[must_use]
    pub fn wpa_path(&self) -> PathBuf {
        self.resolve(&self.wpa_supplicant_conf)
    }

    /// Backup sibling of the supplicant config.
    #[must_use]
    pub fn wpa_backup_path(&self) -> PathBuf {
        backup_path(&self.wpa_path())
    }

    /// Resolved service-manager marker.
    #[must_use]
    pub fn marker_path(&self) -> PathBuf {
        self.resolve(&self.service_marker)
    }

    /// Resolved version file.
    #[must_use]
    pub fn version_path(&self) -> PathBuf {
        self.resolve(&self.version_file)
    }
}

/// `path` with [`BACKUP_SUFFIX`] appended to its file name.
#[must_use]
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve_under_slash() {
        let s = Settings::default();
        assert_eq!(s.hostname_path(), PathBuf::from("/etc/hostname"));
        assert_eq!(s.config_path(), PathBuf::from("/boot/bootconfig.txt"));
    }

    #[test]
    fn root_prefixes_every_path() {
        let s = Settings::with_root("/tmp/sys");
        assert_eq!(s.hosts_path(), PathBuf::from("/tmp/sys/etc/hosts"));
        assert_eq!(
            s.wpa_backup_path(),
            PathBuf::from("/tmp/sys/etc/wpa_supplicant/wpa_supplicant.conf.backup")
        );
        assert_eq!(s.marker_path(), PathBuf::from("/tmp/sys/run/systemd/system"));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let s = Settings::from_toml("hosts_file = \"/etc/hosts.local\"\n").unwrap();
        assert_eq!(s.hosts_file, PathBuf::from("/etc/hosts.local"));
        assert_eq!(s.hostname_file, PathBuf::from("/etc/hostname"));
        assert_eq!(s.selftest_packages.len(), 2);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = Settings::from_toml("hostnme_file = \"/x\"\n").unwrap_err();
        assert!(err.contains("hostnme_file"), "unexpected message: {err}");
    }

    #[test]
    fn load_explicit_missing_is_settings_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load(Some(&dir.path().join("settings.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Settings { .. }));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "root = \"/mnt/sd\"\nselftest_packages = []\n").unwrap();
        let s = Settings::load(Some(&path)).unwrap();
        assert_eq!(s.root, PathBuf::from("/mnt/sd"));
        assert!(s.selftest_packages.is_empty());
    }

    #[test]
    fn load_invalid_toml_is_settings_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "root = [\n").unwrap();
        let err = Settings::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Settings { .. }));
    }

    #[test]
    fn backup_path_appends_suffix() {
        assert_eq!(
            backup_path(Path::new("/etc/a.conf")),
            PathBuf::from("/etc/a.conf.backup")
        );
    }
}
