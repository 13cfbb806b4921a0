//! System state the handlers converge: files under `/etc` and live values
//! queried through OS tools.
pub mod essid;
pub mod file;
pub mod hostname_file;
pub mod hosts_entry;
pub mod runtime_hostname;
pub mod wpa_config;

use anyhow::Result;

/// What a resource currently looks like compared with what is wanted.
///
/// # Examples
///
/// ```
/// use bootconfig::resources::ResourceState;
///
/// let stale = ResourceState::Incorrect { current: "raspberrypi".into() };
/// assert_ne!(stale, ResourceState::Correct);
/// assert_ne!(ResourceState::Missing, ResourceState::Correct);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Absent file, or a query that printed nothing.
    Missing,
    /// Already holds the wanted value.
    Correct,
    /// Holds some other value.
    Incorrect {
        /// What was found (a value, a line, or a short note).
        current: String,
    },
}

/// What [`Resource::apply`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// Written or set.
    Applied,
    /// Found correct on re-check; nothing written.
    AlreadyCorrect,
}

/// A piece of system state that can be inspected and then converged.
///
/// Handlers call [`current_state`](Self::current_state) first and only
/// [`apply`](Self::apply) when the answer is `Missing` or `Incorrect`.
pub trait Resource {
    /// Short label used in log lines (usually a path).
    fn description(&self) -> String;

    /// Inspect the live system.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be determined (unreadable file).
    fn current_state(&self) -> Result<ResourceState>;

    /// Write the file or run the command that sets the wanted value.
    ///
    /// # Errors
    ///
    /// Returns an error if a write or a checked command fails.
    fn apply(&self) -> Result<ResourceChange>;

    /// Whether [`apply`](Self::apply) would do anything.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`current_state`](Self::current_state).
    fn needs_change(&self) -> Result<bool> {
        Ok(matches!(
            self.current_state()?,
            ResourceState::Missing | ResourceState::Incorrect { .. }
        ))
    }
}

/// Compare a trimmed current value against the desired one.
pub(crate) fn compare(current: &str, desired: &str) -> ResourceState {
    let current = current.trim();
    if current.is_empty() {
        ResourceState::Missing
    } else if current == desired {
        ResourceState::Correct
    } else {
        ResourceState::Incorrect {
            current: current.to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    struct Fixed(ResourceState);

    impl Resource for Fixed {
        fn description(&self) -> String {
            "fixed".to_string()
        }

        fn current_state(&self) -> Result<ResourceState> {
            Ok(self.0.clone())
        }

        fn apply(&self) -> Result<ResourceChange> {
            Ok(ResourceChange::Applied)
        }
    }

    #[test]
    fn missing_and_incorrect_need_change() {
        assert!(Fixed(ResourceState::Missing).needs_change().unwrap());
        let stale = ResourceState::Incorrect {
            current: "raspberrypi".to_string(),
        };
        assert!(Fixed(stale).needs_change().unwrap());
    }

    #[test]
    fn correct_is_left_alone() {
        assert!(!Fixed(ResourceState::Correct).needs_change().unwrap());
    }

    #[test]
    fn compare_trims_and_classifies() {
        assert_eq!(compare("  \n", "pi"), ResourceState::Missing);
        assert_eq!(compare("pi\n", "pi"), ResourceState::Correct);
        assert_eq!(
            compare("old\n", "pi"),
            ResourceState::Incorrect {
                current: "old".to_string()
            }
        );
    }
}
