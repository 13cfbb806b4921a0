//! Resource processing: check state, apply when different, count outcomes.
use anyhow::Result;

use super::{Context, HandlerResult};
use crate::resources::{Resource, ResourceChange, ResourceState};

/// What happened to one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Already in the desired state; nothing was done.
    AlreadyOk,
    /// The resource was changed.
    Changed,
    /// A dry run would have changed the resource.
    WouldChange,
    /// The resource was left alone (invalid, or a tolerated failure).
    Skipped,
}

impl Outcome {
    /// Whether the resource was (or in a dry run, would be) modified.
    #[must_use]
    pub const fn is_change(self) -> bool {
        matches!(self, Self::Changed | Self::WouldChange)
    }
}

/// Counters for the resources a handler processed.
///
/// # Examples
///
/// ```
/// use bootconfig::handlers::{HandlerStats, Outcome};
///
/// let mut stats = HandlerStats::new();
/// stats.record(Outcome::Changed);
/// stats.record(Outcome::AlreadyOk);
/// stats.record(Outcome::AlreadyOk);
///
/// assert_eq!(stats.summary(false), "1 changed, 2 already ok");
/// assert_eq!(stats.summary(true), "1 would change, 2 already ok");
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HandlerStats {
    /// Resources changed, or that would change in a dry run.
    pub changed: u32,
    /// Resources already in the desired state.
    pub already_ok: u32,
    /// Resources skipped.
    pub skipped: u32,
}

impl HandlerStats {
    /// Create a new empty stats counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one outcome.
    pub const fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::AlreadyOk => self.already_ok += 1,
            Outcome::Changed | Outcome::WouldChange => self.changed += 1,
            Outcome::Skipped => self.skipped += 1,
        }
    }

    /// Whether anything changed.
    #[must_use]
    pub const fn any_changed(&self) -> bool {
        self.changed > 0
    }

    /// Format the summary string (e.g. "1 changed, 2 already ok, 1 skipped").
    #[must_use]
    pub fn summary(&self, dry_run: bool) -> String {
        let verb = if dry_run { "would change" } else { "changed" };
        if self.skipped > 0 {
            format!(
                "{} {verb}, {} already ok, {} skipped",
                self.changed, self.already_ok, self.skipped
            )
        } else {
            format!("{} {verb}, {} already ok", self.changed, self.already_ok)
        }
    }

    /// Turn the counters into the handler's result.
    #[must_use]
    pub fn finish(self, ctx: &Context) -> HandlerResult {
        let line = self.summary(ctx.dry_run);
        if ctx.dry_run {
            HandlerResult::DryRun(vec![line])
        } else {
            HandlerResult::Ok(vec![line])
        }
    }
}

/// Check a resource and apply it when it is missing or different.
///
/// A failed state check always propagates. A failed apply propagates when
/// `bail_on_error` is set; otherwise it is logged with the error marker and
/// counted as skipped.
///
/// # Errors
///
/// Returns an error if the state cannot be determined, or if the apply fails
/// and `bail_on_error` is set.
pub fn process_resource<R: Resource + ?Sized>(
    ctx: &Context,
    resource: &R,
    verb: &str,
    bail_on_error: bool,
) -> Result<Outcome> {
    let desc = resource.description();
    let state = resource.current_state()?;
    match state {
        ResourceState::Correct => {
            ctx.log.debug(&format!("ok: {desc}"));
            Ok(Outcome::AlreadyOk)
        }
        state @ (ResourceState::Missing | ResourceState::Incorrect { .. }) => {
            if ctx.dry_run {
                let msg = if let ResourceState::Incorrect { current } = &state {
                    format!("would {verb} {desc} (currently {current})")
                } else {
                    format!("would {verb} {desc}")
                };
                ctx.log.dry_run(&msg);
                return Ok(Outcome::WouldChange);
            }
            apply(ctx, resource, &desc, verb, bail_on_error)
        }
    }
}

fn apply<R: Resource + ?Sized>(
    ctx: &Context,
    resource: &R,
    desc: &str,
    verb: &str,
    bail_on_error: bool,
) -> Result<Outcome> {
    match resource.apply() {
        Ok(ResourceChange::Applied) => {
            ctx.log.log(&[verb, desc]);
            Ok(Outcome::Changed)
        }
        Ok(ResourceChange::AlreadyCorrect) => Ok(Outcome::AlreadyOk),
        Err(e) if bail_on_error => Err(e.context(format!("failed to {verb} {desc}"))),
        Err(e) => {
            ctx.log.error(&format!("failed to {verb} {desc}: {e:#}"));
            Ok(Outcome::Skipped)
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::cell::Cell;
    use std::sync::Arc;

    use super::*;
    use crate::handlers::test_helpers::{MockExecutor, make_context};

    /// A configurable resource that counts how often it was applied.
    struct MockResource {
        state: Result<ResourceState, String>,
        apply_result: Result<ResourceChange, String>,
        applied: Cell<u32>,
    }

    impl MockResource {
        fn new(state: ResourceState) -> Self {
            Self {
                state: Ok(state),
                apply_result: Ok(ResourceChange::Applied),
                applied: Cell::new(0),
            }
        }

        fn with_apply(mut self, result: Result<ResourceChange, String>) -> Self {
            self.apply_result = result;
            self
        }
    }

    impl Resource for MockResource {
        fn description(&self) -> String {
            "mock".to_string()
        }

        fn current_state(&self) -> Result<ResourceState> {
            self.state.clone().map_err(|s| anyhow::anyhow!("{s}"))
        }

        fn apply(&self) -> Result<ResourceChange> {
            self.applied.set(self.applied.get() + 1);
            self.apply_result.clone().map_err(|s| anyhow::anyhow!("{s}"))
        }
    }

    fn context(dry_run: bool) -> (tempfile::TempDir, Context) {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = make_context(dir.path(), "", Arc::new(MockExecutor::new()));
        ctx.dry_run = dry_run;
        (dir, ctx)
    }

    #[test]
    fn correct_is_not_applied() {
        let (_dir, ctx) = context(false);
        let r = MockResource::new(ResourceState::Correct);
        assert_eq!(process_resource(&ctx, &r, "write", true).unwrap(), Outcome::AlreadyOk);
        assert_eq!(r.applied.get(), 0);
    }

    #[test]
    fn missing_is_applied_and_logged() {
        let (_dir, ctx) = context(false);
        let r = MockResource::new(ResourceState::Missing);
        assert_eq!(process_resource(&ctx, &r, "write", true).unwrap(), Outcome::Changed);
        assert_eq!(r.applied.get(), 1);
        assert_eq!(ctx.log.lines(), vec!["write :: mock"]);
    }

    #[test]
    fn dry_run_never_applies() {
        let (_dir, ctx) = context(true);
        let r = MockResource::new(ResourceState::Incorrect {
            current: "old".to_string(),
        });
        assert_eq!(
            process_resource(&ctx, &r, "write", true).unwrap(),
            Outcome::WouldChange
        );
        assert_eq!(r.applied.get(), 0);
        assert_eq!(ctx.log.lines(), vec!["dry run :: would write mock (currently old)"]);
    }

    #[test]
    fn apply_error_bails_when_requested() {
        let (_dir, ctx) = context(false);
        let r = MockResource::new(ResourceState::Missing).with_apply(Err("disk full".to_string()));
        let err = process_resource(&ctx, &r, "write", true).unwrap_err();
        assert_eq!(format!("{err:#}"), "failed to write mock: disk full");
    }

    #[test]
    fn apply_error_is_logged_when_tolerated() {
        let (_dir, ctx) = context(false);
        let r = MockResource::new(ResourceState::Missing).with_apply(Err("busy".to_string()));
        assert_eq!(process_resource(&ctx, &r, "set", false).unwrap(), Outcome::Skipped);
        assert_eq!(ctx.log.lines(), vec!["ERROR :: failed to set mock: busy"]);
    }

    #[test]
    fn state_error_always_propagates() {
        let (_dir, ctx) = context(false);
        let mut r = MockResource::new(ResourceState::Missing);
        r.state = Err("unreadable".to_string());
        assert!(process_resource(&ctx, &r, "write", false).is_err());
    }

    #[test]
    fn stats_summary_mentions_skipped() {
        let mut stats = HandlerStats::new();
        stats.record(Outcome::Skipped);
        stats.record(Outcome::WouldChange);
        assert!(stats.any_changed());
        assert_eq!(stats.summary(true), "1 would change, 0 already ok, 1 skipped");
    }
}
