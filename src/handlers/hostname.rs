//! Handler: hostname.
use anyhow::Result;

use super::{Context, Handler, HandlerResult, HandlerStats, process_resource};
use crate::exec;
use crate::resources::file;
use crate::resources::hostname_file::HostnameFileResource;
use crate::resources::hosts_entry::HostsEntryResource;
use crate::resources::runtime_hostname::RuntimeHostnameResource;

/// mDNS responder restarted after a hostname change.
pub const AVAHI_SERVICE: &str = "avahi-daemon";

/// Apply the `hostname` key to the hostname file, the live kernel hostname
/// and the hosts file alias.
#[derive(Debug)]
pub struct Hostname;

impl Handler for Hostname {
    fn name(&self) -> &'static str {
        "hostname"
    }

    fn run(&self, ctx: &Context) -> Result<HandlerResult> {
        let Some(hostname) = ctx
            .config
            .get("hostname")
            .map(str::trim)
            .filter(|h| !h.is_empty())
        else {
            return Ok(HandlerResult::Skipped("no hostname configured".to_string()));
        };

        let mut stats = HandlerStats::new();

        // The hosts line to replace names the hostname from before this run.
        let hostname_path = ctx.settings.hostname_path();
        let previous = file::read_optional(&hostname_path)?.map(|c| c.trim().to_string());

        let hostname_file = HostnameFileResource::new(hostname_path, hostname);
        stats.record(process_resource(ctx, &hostname_file, "write", true)?);

        let runtime = RuntimeHostnameResource::new(hostname, ctx.executor(), &ctx.log);
        stats.record(process_resource(ctx, &runtime, "set", false)?);

        let hosts = HostsEntryResource::new(ctx.settings.hosts_path(), previous.as_deref(), hostname);
        stats.record(process_resource(ctx, &hosts, "update", true)?);

        if stats.any_changed() {
            restart_avahi(ctx);
        }
        Ok(stats.finish(ctx))
    }
}

/// Restart the mDNS responder so it advertises the new name.
///
/// Only done when the service manager is running; failures are logged.
fn restart_avahi(ctx: &Context) {
    let marker = ctx.settings.marker_path();
    if !marker.exists() {
        ctx.log.debug(&format!(
            "{} not found, not restarting {AVAHI_SERVICE}",
            marker.display()
        ));
        return;
    }
    if ctx.dry_run {
        ctx.log.dry_run(&format!("would restart {AVAHI_SERVICE}"));
        return;
    }
    ctx.log.log(&["restart", AVAHI_SERVICE]);
    for line in exec::capture_lines(
        ctx.executor(),
        &ctx.log,
        "systemctl",
        &["restart", AVAHI_SERVICE],
    ) {
        ctx.log.log(&["restart", AVAHI_SERVICE, &line]);
    }
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;

    use super::*;
    use crate::handlers::test_helpers::{MockExecutor, make_context};

    fn system(root: &Path, hostname: &str, hosts: &str) {
        std::fs::create_dir_all(root.join("etc")).unwrap();
        std::fs::write(root.join("etc/hostname"), hostname).unwrap();
        std::fs::write(root.join("etc/hosts"), hosts).unwrap();
    }

    fn with_service_manager(root: &Path) {
        std::fs::create_dir_all(root.join("run/systemd/system")).unwrap();
    }

    #[test]
    fn absent_key_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = make_context(dir.path(), "wifi_ssid=home\n", Arc::new(MockExecutor::new()));
        assert_eq!(
            Hostname.run(&ctx).unwrap(),
            HandlerResult::Skipped("no hostname configured".to_string())
        );
    }

    #[test]
    fn blank_value_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = make_context(dir.path(), "hostname=   \n", Arc::new(MockExecutor::new()));
        assert!(matches!(
            Hostname.run(&ctx).unwrap(),
            HandlerResult::Skipped(_)
        ));
    }

    #[test]
    fn applies_all_three_and_restarts_avahi() {
        let dir = tempfile::tempdir().unwrap();
        system(
            dir.path(),
            "raspberrypi\n",
            "127.0.0.1\tlocalhost\n127.0.1.1\traspberrypi\n",
        );
        with_service_manager(dir.path());
        let executor = Arc::new(
            MockExecutor::new()
                .with_output("hostname", "raspberrypi\n")
                .with_output("systemctl", "restarted\n"),
        );
        let ctx = make_context(dir.path(), "hostname=kitchen\n", Arc::clone(&executor) as _);

        let result = Hostname.run(&ctx).unwrap();
        assert_eq!(
            result,
            HandlerResult::Ok(vec!["3 changed, 0 already ok".to_string()])
        );
        assert_eq!(
            std::fs::read_to_string(dir.path().join("etc/hostname")).unwrap(),
            "kitchen\n"
        );
        assert_eq!(
            std::fs::read_to_string(dir.path().join("etc/hosts")).unwrap(),
            "127.0.0.1\tlocalhost\n127.0.1.1\tkitchen\n"
        );
        assert_eq!(
            executor.calls(),
            vec!["hostname", "hostname kitchen", "systemctl restart avahi-daemon"]
        );
        assert!(
            ctx.log
                .lines()
                .contains(&"restart :: avahi-daemon :: restarted".to_string())
        );
    }

    #[test]
    fn second_run_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        system(dir.path(), "kitchen\n", "127.0.1.1\tkitchen\n");
        with_service_manager(dir.path());
        let executor = Arc::new(MockExecutor::new().with_output("hostname", "kitchen\n"));
        let ctx = make_context(dir.path(), "hostname=kitchen\n", Arc::clone(&executor) as _);

        let result = Hostname.run(&ctx).unwrap();
        assert_eq!(
            result,
            HandlerResult::Ok(vec!["0 changed, 3 already ok".to_string()])
        );
        assert_eq!(executor.calls(), vec!["hostname"]);
    }

    #[test]
    fn replaces_only_the_previous_name_line() {
        let dir = tempfile::tempdir().unwrap();
        system(
            dir.path(),
            "raspberrypi\n",
            "127.0.1.1\tmy-nas\n127.0.1.1\traspberrypi\n",
        );
        let executor = Arc::new(MockExecutor::new().with_output("hostname", "raspberrypi\n"));
        let ctx = make_context(dir.path(), "hostname=kitchen\n", Arc::clone(&executor) as _);

        Hostname.run(&ctx).unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.path().join("etc/hosts")).unwrap(),
            "127.0.1.1\tmy-nas\n127.0.1.1\tkitchen\n"
        );
    }

    #[test]
    fn no_restart_without_service_manager() {
        let dir = tempfile::tempdir().unwrap();
        system(dir.path(), "old\n", "127.0.1.1\told\n");
        let executor = Arc::new(MockExecutor::new().with_output("hostname", "old\n"));
        let ctx = make_context(dir.path(), "hostname=new\n", Arc::clone(&executor) as _);

        Hostname.run(&ctx).unwrap();
        assert!(!executor.calls().iter().any(|c| c.starts_with("systemctl")));
    }

    #[test]
    fn failed_set_is_logged_and_handler_continues() {
        let dir = tempfile::tempdir().unwrap();
        system(dir.path(), "old\n", "127.0.1.1\told\n");
        let executor = MockExecutor::new()
            .with_output("hostname", "old\n")
            .with_failure("hostname new");
        let ctx = make_context(dir.path(), "hostname=new\n", Arc::new(executor));

        let result = Hostname.run(&ctx).unwrap();
        assert_eq!(
            result,
            HandlerResult::Ok(vec!["2 changed, 0 already ok, 1 skipped".to_string()])
        );
        assert!(ctx.log.lines().iter().any(|l| l.starts_with("ERROR :: failed to set")));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("etc/hosts")).unwrap(),
            "127.0.1.1\tnew\n"
        );
    }

    #[test]
    fn unreadable_hosts_fails_after_earlier_changes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("etc")).unwrap();
        std::fs::write(dir.path().join("etc/hostname"), "old\n").unwrap();
        let executor = MockExecutor::new().with_output("hostname", "old\n");
        let ctx = make_context(dir.path(), "hostname=new\n", Arc::new(executor));

        assert!(Hostname.run(&ctx).is_err());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("etc/hostname")).unwrap(),
            "new\n"
        );
    }

    #[test]
    fn dry_run_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        system(dir.path(), "old\n", "127.0.1.1\told\n");
        with_service_manager(dir.path());
        let executor = Arc::new(MockExecutor::new().with_output("hostname", "old\n"));
        let mut ctx = make_context(dir.path(), "hostname=new\n", Arc::clone(&executor) as _);
        ctx.dry_run = true;

        let HandlerResult::DryRun(lines) = Hostname.run(&ctx).unwrap() else {
            panic!("expected DryRun");
        };
        assert_eq!(lines, vec!["3 would change, 0 already ok"]);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("etc/hostname")).unwrap(),
            "old\n"
        );
        assert_eq!(executor.calls(), vec!["hostname"]);
        assert!(
            ctx.log
                .lines()
                .contains(&"dry run :: would restart avahi-daemon".to_string())
        );
    }
}
