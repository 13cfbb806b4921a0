//! The `127.0.1.1` alias line in the hosts file.
use std::path::PathBuf;

use anyhow::Result;

use super::{Resource, ResourceChange, ResourceState, file};

/// Loopback alias address that carries the machine's own hostname.
pub const LOOPBACK_ALIAS: &str = "127.0.1.1";

/// The hosts line wanted for `hostname`.
#[must_use]
pub fn entry_line(hostname: &str) -> String {
    format!("{LOOPBACK_ALIAS}\t{hostname}")
}

/// Whether `line` maps [`LOOPBACK_ALIAS`] to `name` as its canonical name.
/// Further aliases on the line are allowed.
fn maps_alias_to(line: &str, name: &str) -> bool {
    let mut fields = line.split_whitespace();
    fields.next() == Some(LOOPBACK_ALIAS) && fields.next() == Some(name)
}

/// Compute the hosts file content with the alias entry for `hostname`.
///
/// A line already mapping `127.0.1.1` to `hostname` leaves the file alone.
/// Otherwise the first line mapping it to `previous` (the name being
/// replaced) is rewritten, and when there is none the entry is appended.
/// Lines for any other name are kept. Returns `None` when nothing changes.
///
/// ```
/// use bootconfig::resources::hosts_entry::updated_hosts;
///
/// let hosts = "127.0.0.1\tlocalhost\n127.0.1.1\told-name\n";
/// assert_eq!(
///     updated_hosts(hosts, Some("old-name"), "new-name").as_deref(),
///     Some("127.0.0.1\tlocalhost\n127.0.1.1\tnew-name\n")
/// );
/// assert_eq!(updated_hosts("127.0.1.1\tnew-name\n", None, "new-name"), None);
/// ```
#[must_use]
pub fn updated_hosts(content: &str, previous: Option<&str>, hostname: &str) -> Option<String> {
    if content.lines().any(|l| maps_alias_to(l, hostname)) {
        return None;
    }

    let desired = entry_line(hostname);
    if let Some(previous) = previous.filter(|p| !p.is_empty())
        && content.lines().any(|l| maps_alias_to(l, previous))
    {
        let mut replaced = false;
        let mut out = content
            .lines()
            .map(|line| {
                if !replaced && maps_alias_to(line, previous) {
                    replaced = true;
                    desired.clone()
                } else {
                    line.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("\n");
        if content.ends_with('\n') {
            out.push('\n');
        }
        return Some(out);
    }

    let mut out = content.to_string();
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&desired);
    out.push('\n');
    Some(out)
}

/// Hosts file entry mapping [`LOOPBACK_ALIAS`] to the hostname.
#[derive(Debug, Clone)]
pub struct HostsEntryResource {
    /// Path of the hosts file.
    pub path: PathBuf,
    /// Hostname the machine had before this run, whose line is replaced.
    pub previous: Option<String>,
    /// Desired hostname.
    pub hostname: String,
}

impl HostsEntryResource {
    /// Create a new hosts entry resource.
    #[must_use]
    pub fn new(path: PathBuf, previous: Option<&str>, hostname: &str) -> Self {
        Self {
            path,
            previous: previous.map(str::to_string),
            hostname: hostname.to_string(),
        }
    }

    fn updated(&self, content: &str) -> Option<String> {
        updated_hosts(content, self.previous.as_deref(), &self.hostname)
    }
}

impl Resource for HostsEntryResource {
    fn description(&self) -> String {
        self.path.display().to_string()
    }

    fn current_state(&self) -> Result<ResourceState> {
        let content = file::read(&self.path)?;
        if self.updated(&content).is_none() {
            return Ok(ResourceState::Correct);
        }
        let stale = self
            .previous
            .as_deref()
            .filter(|p| !p.is_empty())
            .and_then(|p| content.lines().find(|l| maps_alias_to(l, p)));
        Ok(stale.map_or(ResourceState::Missing, |l| ResourceState::Incorrect {
            current: l.to_string(),
        }))
    }

    fn apply(&self) -> Result<ResourceChange> {
        let content = file::read(&self.path)?;
        match self.updated(&content) {
            Some(updated) => {
                file::write(&self.path, &updated, None)?;
                Ok(ResourceChange::Applied)
            }
            None => Ok(ResourceChange::AlreadyCorrect),
        }
    }
}
