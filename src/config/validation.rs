//! Allow-list validation of configuration keys.
use super::Config;

/// Keys the handlers understand.
pub const KNOWN_KEYS: &[&str] = &["hostname", "wifi_ssid", "wifi_password"];

/// Message attached to keys outside [`KNOWN_KEYS`].
pub const UNRECOGNIZED: &str = "error: unrecognized configuration key";

/// Outcome of checking one key against the allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCheck {
    /// The (lowercased) key as found in the config file.
    pub key: String,
    /// Whether the key is in [`KNOWN_KEYS`].
    pub valid: bool,
}

impl KeyCheck {
    /// Status column for log output: `valid` or [`UNRECOGNIZED`].
    #[must_use]
    pub const fn status(&self) -> &'static str {
        if self.valid { "valid" } else { UNRECOGNIZED }
    }
}

/// Check every key in `config`, in sorted key order.
#[must_use]
pub fn check_keys(config: &Config) -> Vec<KeyCheck> {
    config
        .keys()
        .map(|key| KeyCheck {
            key: key.to_string(),
            valid: KNOWN_KEYS.contains(&key),
        })
        .collect()
}
