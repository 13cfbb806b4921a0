//! Shared execution context for handlers.
use std::sync::Arc;

use crate::config::Config;
use crate::config::settings::Settings;
use crate::exec::Executor;
use crate::logging::Logger;

/// Shared context handed to every handler.
#[derive(Debug, Clone)]
pub struct Context {
    /// Parsed boot configuration.
    pub config: Arc<Config>,
    /// Locations of the system files handlers touch.
    pub settings: Arc<Settings>,
    /// Logger scoped to the current position in the dispatch cycle.
    pub log: Logger,
    /// Whether to preview changes without applying them.
    pub dry_run: bool,
    /// Command executor (for testing or real system calls).
    pub executor: Arc<dyn Executor>,
}

impl Context {
    /// Creates a new context for a dispatch cycle.
    #[must_use]
    pub fn new(
        config: Arc<Config>,
        settings: Arc<Settings>,
        log: Logger,
        dry_run: bool,
        executor: Arc<dyn Executor>,
    ) -> Self {
        Self {
            config,
            settings,
            log,
            dry_run,
            executor,
        }
    }

    /// Clone this context with a different logger.
    ///
    /// The dispatcher uses this to hand each handler a logger scoped to the
    /// handler's name.
    #[must_use]
    pub fn with_log(&self, log: Logger) -> Self {
        Self {
            log,
            ..self.clone()
        }
    }

    /// The executor as a plain trait object reference.
    #[must_use]
    pub fn executor(&self) -> &dyn Executor {
        self.executor.as_ref()
    }
}
