//! Handler: selftest.
use anyhow::{Context as _, Result};

use super::{Context, Handler, HandlerResult};
use crate::config::validation::check_keys;
use crate::exec;
use crate::logging::SEPARATOR;
use crate::resources::file;

/// Package status tool.
const PACKAGE_QUERY: &str = "dpkg-query";

/// Status substring reported by `dpkg-query` for an installed package.
const INSTALLED_STATUS: &str = "install ok installed";

/// Reported for every package when the status tool is not on `PATH`.
const UNCHECKED_STATUS: &str = "unchecked: dpkg-query not found";

/// Report key validity, package status and the OS version. Never mutates.
#[derive(Debug)]
pub struct SelfTest;

impl Handler for SelfTest {
    fn name(&self) -> &'static str {
        "selftest"
    }

    fn run(&self, ctx: &Context) -> Result<HandlerResult> {
        let mut lines: Vec<String> = check_keys(&ctx.config)
            .iter()
            .map(|check| [check.key.as_str(), check.status()].join(SEPARATOR))
            .collect();

        let can_query = ctx.executor().which(PACKAGE_QUERY);
        for package in &ctx.settings.selftest_packages {
            let state = if can_query {
                package_state(ctx, package)
            } else {
                UNCHECKED_STATUS
            };
            lines.push(["package", package.as_str(), state].join(SEPARATOR));
        }

        let version_path = ctx.settings.version_path();
        let version = file::read(&version_path)
            .with_context(|| format!("reading version from {}", version_path.display()))?;
        lines.push(["version", version.trim()].join(SEPARATOR));

        Ok(HandlerResult::Ok(lines))
    }
}

fn package_state(ctx: &Context, package: &str) -> &'static str {
    let status = exec::capture(
        ctx.executor(),
        &ctx.log,
        PACKAGE_QUERY,
        &["-W", "--showformat=${Status}", package],
    );
    if status.contains(INSTALLED_STATUS) {
        "installed"
    } else {
        "not installed"
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
    use std::sync::Arc;

    use super::*;
    use crate::handlers::test_helpers::{MockExecutor, make_context};

    const AVAHI: &str = "dpkg-query -W --showformat=${Status} avahi-daemon";
    const WPA: &str = "dpkg-query -W --showformat=${Status} wpasupplicant";

    fn with_version(dir: &tempfile::TempDir) {
        std::fs::create_dir_all(dir.path().join("etc")).unwrap();
        std::fs::write(dir.path().join("etc/debian_version"), "12.5\n").unwrap();
    }

    #[test]
    fn reports_keys_packages_and_version() {
        let dir = tempfile::tempdir().unwrap();
        with_version(&dir);
        let executor = MockExecutor::new()
            .with_output(AVAHI, "install ok installed")
            .with_output(WPA, "deinstall ok config-files");
        let ctx = make_context(
            dir.path(),
            "hostname=pi\ncolour=blue\n",
            Arc::new(executor),
        );

        let HandlerResult::Ok(lines) = SelfTest.run(&ctx).unwrap() else {
            panic!("expected Ok");
        };
        assert_eq!(
            lines,
            vec![
                "colour :: error: unrecognized configuration key",
                "hostname :: valid",
                "package :: avahi-daemon :: installed",
                "package :: wpasupplicant :: not installed",
                "version :: 12.5",
            ]
        );
    }

    #[test]
    fn missing_package_tool_skips_queries() {
        let dir = tempfile::tempdir().unwrap();
        with_version(&dir);
        let executor = Arc::new(MockExecutor::new());
        let ctx = make_context(dir.path(), "", Arc::clone(&executor) as _);

        let HandlerResult::Ok(lines) = SelfTest.run(&ctx).unwrap() else {
            panic!("expected Ok");
        };
        assert_eq!(
            lines,
            vec![
                "package :: avahi-daemon :: unchecked: dpkg-query not found",
                "package :: wpasupplicant :: unchecked: dpkg-query not found",
                "version :: 12.5",
            ]
        );
        assert!(executor.calls().is_empty());
        assert!(ctx.log.lines().is_empty());
    }

    #[test]
    fn failed_package_query_is_logged_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        with_version(&dir);
        let ctx = make_context(
            dir.path(),
            "",
            Arc::new(MockExecutor::new().with_failure("dpkg-query")),
        );

        let HandlerResult::Ok(lines) = SelfTest.run(&ctx).unwrap() else {
            panic!("expected Ok");
        };
        assert_eq!(lines[0], "package :: avahi-daemon :: not installed");
        assert!(ctx.log.lines()[0].starts_with("ERROR :: dpkg-query"));
    }

    #[test]
    fn unreadable_version_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let executor = MockExecutor::new().with_output("dpkg-query", "install ok installed");
        let ctx = make_context(dir.path(), "", Arc::new(executor));
        let err = SelfTest.run(&ctx).unwrap_err();
        assert!(format!("{err:#}").contains("debian_version"));
    }

    #[test]
    fn never_writes() {
        let dir = tempfile::tempdir().unwrap();
        with_version(&dir);
        let executor = Arc::new(MockExecutor::new().with_output("dpkg-query", ""));
        let ctx = make_context(dir.path(), "hostname=pi\n", Arc::clone(&executor) as _);
        SelfTest.run(&ctx).unwrap();
        assert!(
            executor
                .calls()
                .iter()
                .all(|c| c.starts_with("dpkg-query"))
        );
        assert!(!dir.path().join("etc/hostname").exists());
    }
}
