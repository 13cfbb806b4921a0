//! Live kernel hostname resource.
use anyhow::Result;

use super::{Resource, ResourceChange, ResourceState, compare};
use crate::exec::{self, Executor};
use crate::logging::Logger;

/// The live kernel hostname, queried and set with `hostname`.
#[derive(Debug)]
pub struct RuntimeHostnameResource<'a> {
    hostname: String,
    executor: &'a dyn Executor,
    log: &'a Logger,
}

impl<'a> RuntimeHostnameResource<'a> {
    /// Create a new runtime hostname resource.
    #[must_use]
    pub fn new(hostname: &str, executor: &'a dyn Executor, log: &'a Logger) -> Self {
        Self {
            hostname: hostname.to_string(),
            executor,
            log,
        }
    }
}

impl Resource for RuntimeHostnameResource<'_> {
    fn description(&self) -> String {
        "runtime hostname".to_string()
    }

    fn current_state(&self) -> Result<ResourceState> {
        // A failed query is logged and treated as an empty answer.
        let current = exec::capture(self.executor, self.log, "hostname", &[]);
        Ok(compare(&current, &self.hostname))
    }

    fn apply(&self) -> Result<ResourceChange> {
        self.executor.run("hostname", &[&self.hostname])?;
        Ok(ResourceChange::Applied)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::handlers::test_helpers::MockExecutor;

    #[test]
    fn matching_hostname_is_correct() {
        let executor = MockExecutor::new().with_output("hostname", "pi\n");
        let log = Logger::new();
        let r = RuntimeHostnameResource::new("pi", &executor, &log);
        assert_eq!(r.current_state().unwrap(), ResourceState::Correct);
    }

    #[test]
    fn failed_query_is_missing_and_logged() {
        let executor = MockExecutor::new();
        let log = Logger::new();
        let r = RuntimeHostnameResource::new("pi", &executor, &log);
        assert_eq!(r.current_state().unwrap(), ResourceState::Missing);
        assert!(log.lines()[0].contains("ERROR"));
    }

    #[test]
    fn apply_invokes_hostname_with_value() {
        let executor = MockExecutor::new().with_output("hostname", "old\n");
        let log = Logger::new();
        let r = RuntimeHostnameResource::new("kitchen", &executor, &log);
        r.apply().unwrap();
        assert_eq!(executor.calls(), vec!["hostname kitchen"]);
    }

    #[test]
    fn apply_failure_propagates() {
        let executor = MockExecutor::new().with_failure("hostname");
        let log = Logger::new();
        let r = RuntimeHostnameResource::new("kitchen", &executor, &log);
        assert!(r.apply().is_err());
    }
}
