//! Named handlers that apply one configuration concern each, and the
//! dispatcher that runs them in registration order.
pub mod context;
pub mod hostname;
mod processing;
pub mod selftest;
pub mod wifi;

pub use context::Context;
pub use processing::{HandlerStats, Outcome, process_resource};

use anyhow::{Result, bail};

use crate::logging::HandlerStatus;

/// Result of a single handler run.
///
/// # Examples
///
/// ```
/// use bootconfig::handlers::HandlerResult;
///
/// let ok = HandlerResult::Ok(vec!["1 changed, 2 already ok".into()]);
/// let skipped = HandlerResult::Skipped("no hostname configured".into());
///
/// assert!(matches!(ok, HandlerResult::Ok(_)));
/// assert!(matches!(skipped, HandlerResult::Skipped(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerResult {
    /// Handler completed; the lines are logged under its label.
    Ok(Vec<String>),
    /// Handler had nothing to do.
    Skipped(String),
    /// Handler ran in dry-run mode.
    DryRun(Vec<String>),
}

/// A unit of behavior applying one configuration concern to the system.
pub trait Handler {
    /// Name used as the log label and by `--only` / `--skip`.
    fn name(&self) -> &'static str;

    /// Apply the handler's concern.
    ///
    /// # Errors
    ///
    /// Returns an error if a required file cannot be read or written.
    fn run(&self, ctx: &Context) -> Result<HandlerResult>;
}

/// Every handler, in the order they run.
#[must_use]
pub fn all_handlers() -> Vec<Box<dyn Handler>> {
    vec![
        Box::new(selftest::SelfTest),
        Box::new(hostname::Hostname),
        Box::new(wifi::Wifi),
    ]
}

/// Filter `handlers` by name, keeping registration order.
///
/// An empty `only` keeps everything not named in `skip`.
///
/// # Errors
///
/// Returns an error if `only` or `skip` names a handler that does not exist.
pub fn select(
    handlers: Vec<Box<dyn Handler>>,
    only: &[String],
    skip: &[String],
) -> Result<Vec<Box<dyn Handler>>> {
    let known: Vec<&str> = handlers.iter().map(|h| h.name()).collect();
    if let Some(unknown) = only
        .iter()
        .chain(skip)
        .find(|name| !known.contains(&name.as_str()))
    {
        bail!(
            "unknown handler: {unknown} (expected one of {})",
            known.join(", ")
        );
    }
    Ok(handlers
        .into_iter()
        .filter(|h| only.is_empty() || only.iter().any(|n| n == h.name()))
        .filter(|h| !skip.iter().any(|n| n == h.name()))
        .collect())
}

/// Run a handler under its own label, recording the result in the logger.
pub fn execute(handler: &dyn Handler, ctx: &Context) {
    let name = handler.name();
    let log = ctx.log.scope(name);
    let scoped = ctx.with_log(log.clone());

    match handler.run(&scoped) {
        Ok(HandlerResult::Ok(lines)) => {
            for line in &lines {
                log.info(line);
            }
            log.record_handler(name, HandlerStatus::Ok, None);
        }
        Ok(HandlerResult::Skipped(reason)) => {
            log.log(&["skipped", &reason]);
            log.record_handler(name, HandlerStatus::Skipped, Some(&reason));
        }
        Ok(HandlerResult::DryRun(lines)) => {
            for line in &lines {
                log.dry_run(line);
            }
            log.record_handler(name, HandlerStatus::DryRun, None);
        }
        Err(e) => {
            log.error(&format!("{e:#}"));
            log.record_handler(name, HandlerStatus::Failed, Some(&format!("{e:#}")));
        }
    }
}

/// Run every handler in order inside the `run` scope, then log the summary.
///
/// Returns the number of handlers that failed.
pub fn run_all(handlers: &[Box<dyn Handler>], ctx: &Context) -> usize {
    let log = ctx.log.scope("run");
    let run_ctx = ctx.with_log(log.clone());
    for handler in handlers {
        execute(handler.as_ref(), &run_ctx);
    }
    log.print_summary();
    log.failure_count()
}
