//! Wireless ESSID resource.
use anyhow::Result;

use super::{Resource, ResourceChange, ResourceState, compare};
use crate::exec::{self, Executor};
use crate::logging::Logger;

/// The ESSID of a wireless interface, read with `iwgetid` and set with
/// `iwconfig`. Used only when no passphrase is configured.
#[derive(Debug)]
pub struct EssidResource<'a> {
    interface: String,
    ssid: String,
    executor: &'a dyn Executor,
    log: &'a Logger,
}

impl<'a> EssidResource<'a> {
    /// Create a new ESSID resource for `interface`.
    #[must_use]
    pub fn new(interface: &str, ssid: &str, executor: &'a dyn Executor, log: &'a Logger) -> Self {
        Self {
            interface: interface.to_string(),
            ssid: ssid.to_string(),
            executor,
            log,
        }
    }
}

impl Resource for EssidResource<'_> {
    fn description(&self) -> String {
        format!("{} essid", self.interface)
    }

    fn current_state(&self) -> Result<ResourceState> {
        let current = exec::capture(
            self.executor,
            self.log,
            "iwgetid",
            &[&self.interface, "--raw"],
        );
        Ok(compare(&current, &self.ssid))
    }

    fn apply(&self) -> Result<ResourceChange> {
        self.executor
            .run("iwconfig", &[&self.interface, "essid", &self.ssid])?;
        Ok(ResourceChange::Applied)
    }
}
