//! Handler: wifi.
use anyhow::Result;

use super::{Context, Handler, HandlerResult, HandlerStats, Outcome, process_resource};
use crate::exec;
use crate::resources::Resource;
use crate::resources::essid::EssidResource;
use crate::resources::wpa_config::{self, WpaConfigResource};

/// Interface used when joining an open network with `iwconfig`.
pub const FALLBACK_INTERFACE: &str = "wlan0";

/// Apply `wifi_ssid` / `wifi_password` through the supplicant config, or set
/// the ESSID directly for open networks.
#[derive(Debug)]
pub struct Wifi;

impl Handler for Wifi {
    fn name(&self) -> &'static str {
        "wifi"
    }

    fn run(&self, ctx: &Context) -> Result<HandlerResult> {
        let Some(ssid) = ctx
            .config
            .get("wifi_ssid")
            .filter(|s| !s.trim().is_empty())
        else {
            return Ok(HandlerResult::Skipped("no wifi_ssid configured".to_string()));
        };

        let interfaces = wireless_interfaces(ctx);
        if interfaces.is_empty() {
            return Ok(HandlerResult::Skipped(
                "no wireless hardware detected".to_string(),
            ));
        }
        ctx.log
            .debug(&format!("wireless interfaces: {}", interfaces.join(", ")));

        let mut stats = HandlerStats::new();
        match ctx.config.get("wifi_password").filter(|p| !p.is_empty()) {
            Some(password) => {
                let block =
                    exec::capture(ctx.executor(), &ctx.log, "wpa_passphrase", &[ssid, password]);
                let resource = WpaConfigResource::new(
                    ctx.settings.wpa_path(),
                    ctx.settings.wpa_backup_path(),
                    wpa_config::render(&ctx.config.path, &block),
                );
                stats.record(configure_supplicant(ctx, &resource)?);
            }
            None => {
                let essid = EssidResource::new(FALLBACK_INTERFACE, ssid, ctx.executor(), &ctx.log);
                stats.record(process_resource(ctx, &essid, "set", false)?);
            }
        }
        Ok(stats.finish(ctx))
    }
}

/// Names from the `Interface <name>` lines of `iw dev`.
fn wireless_interfaces(ctx: &Context) -> Vec<String> {
    exec::capture_lines(ctx.executor(), &ctx.log, "iw", &["dev"])
        .iter()
        .filter_map(|line| line.trim().strip_prefix("Interface "))
        .map(|name| name.trim().to_string())
        .collect()
}

fn configure_supplicant(ctx: &Context, resource: &WpaConfigResource) -> Result<Outcome> {
    if !resource.needs_change()? {
        ctx.log.debug(&format!("ok: {}", resource.description()));
        return Ok(Outcome::AlreadyOk);
    }
    if ctx.dry_run {
        return process_resource(ctx, resource, "write", true);
    }

    // The supplicant is reloaded before the file is rewritten.
    for line in exec::capture_lines(ctx.executor(), &ctx.log, "wpa_cli", &["reconfigure"]) {
        ctx.log.log(&["wpa_cli", &line]);
    }
    process_resource(ctx, resource, "write", true)
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

    const IW_DEV: &str = "phy#0\n\tInterface wlan0\n\t\tifindex 3\n\t\ttype managed\n";
    const BLOCK: &str = "network={\n\tssid=\"home\"\n\tpsk=0123abcd\n}\n";

    fn wpa_path(root: &Path) -> std::path::PathBuf {
        root.join("etc/wpa_supplicant/wpa_supplicant.conf")
    }

    fn supplicant_executor() -> Arc<MockExecutor> {
        Arc::new(
            MockExecutor::new()
                .with_output("iw", IW_DEV)
                .with_output("wpa_passphrase", BLOCK)
                .with_output("wpa_cli", "OK\n"),
        )
    }

    #[test]
    fn absent_ssid_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = make_context(dir.path(), "hostname=pi\n", Arc::new(MockExecutor::new()));
        assert_eq!(
            Wifi.run(&ctx).unwrap(),
            HandlerResult::Skipped("no wifi_ssid configured".to_string())
        );
    }

    #[test]
    fn blank_ssid_is_skipped_without_commands() {
        let dir = tempfile::tempdir().unwrap();
        let executor = Arc::new(MockExecutor::new().with_output("iw", IW_DEV));
        let ctx = make_context(dir.path(), "wifi_ssid =  \n", Arc::clone(&executor) as _);
        assert_eq!(
            Wifi.run(&ctx).unwrap(),
            HandlerResult::Skipped("no wifi_ssid configured".to_string())
        );
        assert!(executor.calls().is_empty());
    }

    #[test]
    fn no_hardware_skips_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let executor = Arc::new(MockExecutor::new().with_output("iw", "phy#0\n"));
        let ctx = make_context(
            dir.path(),
            "wifi_ssid=home\nwifi_password=secret\n",
            Arc::clone(&executor) as _,
        );

        let HandlerResult::Skipped(reason) = Wifi.run(&ctx).unwrap() else {
            panic!("expected Skipped");
        };
        assert!(reason.contains("hardware"));
        assert_eq!(executor.calls(), vec!["iw dev"]);
        assert!(!wpa_path(dir.path()).exists());
    }

    #[test]
    fn missing_iw_counts_as_no_hardware() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = make_context(dir.path(), "wifi_ssid=home\n", Arc::new(MockExecutor::new()));
        assert!(matches!(Wifi.run(&ctx).unwrap(), HandlerResult::Skipped(_)));
        assert!(ctx.log.lines()[0].starts_with("ERROR :: iw"));
    }

    #[test]
    fn password_writes_supplicant_config_with_backup() {
        let dir = tempfile::tempdir().unwrap();
        let path = wpa_path(dir.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "factory\n").unwrap();
        let executor = supplicant_executor();
        let ctx = make_context(
            dir.path(),
            "wifi_ssid=home\nwifi_password=secret\n",
            Arc::clone(&executor) as _,
        );

        Wifi.run(&ctx).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with(wpa_config::CTRL_INTERFACE));
        assert!(written.ends_with(BLOCK));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("etc/wpa_supplicant/wpa_supplicant.conf.backup"))
                .unwrap(),
            "factory\n"
        );
        assert_eq!(
            executor.calls(),
            vec!["iw dev", "wpa_passphrase home secret", "wpa_cli reconfigure"]
        );
    }

    #[test]
    fn unchanged_supplicant_config_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let executor = supplicant_executor();
        let ctx = make_context(
            dir.path(),
            "wifi_ssid=home\nwifi_password=secret\n",
            Arc::clone(&executor) as _,
        );

        Wifi.run(&ctx).unwrap();
        let result = Wifi.run(&ctx).unwrap();

        assert_eq!(
            result,
            HandlerResult::Ok(vec!["0 changed, 1 already ok".to_string()])
        );
        let reconfigures = executor
            .calls()
            .iter()
            .filter(|c| c.starts_with("wpa_cli"))
            .count();
        assert_eq!(reconfigures, 1);
    }

    #[test]
    fn ssid_with_spaces_is_passed_as_one_argument() {
        let dir = tempfile::tempdir().unwrap();
        let executor = supplicant_executor();
        let ctx = make_context(
            dir.path(),
            "wifi_ssid=Cafe Guest\nwifi_password=pass word\n",
            Arc::clone(&executor) as _,
        );
        Wifi.run(&ctx).unwrap();
        assert_eq!(executor.calls()[1], "wpa_passphrase Cafe Guest pass word");
    }

    #[test]
    fn open_network_sets_essid_on_wlan0() {
        let dir = tempfile::tempdir().unwrap();
        let executor = Arc::new(
            MockExecutor::new()
                .with_output("iw", IW_DEV)
                .with_output("iwgetid", "\n")
                .with_output("iwconfig", ""),
        );
        let ctx = make_context(dir.path(), "wifi_ssid=home\n", Arc::clone(&executor) as _);

        Wifi.run(&ctx).unwrap();
        assert_eq!(
            executor.calls(),
            vec!["iw dev", "iwgetid wlan0 --raw", "iwconfig wlan0 essid home"]
        );
        assert!(!wpa_path(dir.path()).exists());
    }

    #[test]
    fn open_network_already_joined() {
        let dir = tempfile::tempdir().unwrap();
        let executor = Arc::new(
            MockExecutor::new()
                .with_output("iw", IW_DEV)
                .with_output("iwgetid", "home\n"),
        );
        let ctx = make_context(
            dir.path(),
            "wifi_ssid=home\nwifi_password=\n",
            Arc::clone(&executor) as _,
        );

        Wifi.run(&ctx).unwrap();
        assert_eq!(executor.calls(), vec!["iw dev", "iwgetid wlan0 --raw"]);
    }

    #[test]
    fn dry_run_does_not_reconfigure_or_write() {
        let dir = tempfile::tempdir().unwrap();
        let executor = supplicant_executor();
        let mut ctx = make_context(
            dir.path(),
            "wifi_ssid=home\nwifi_password=secret\n",
            Arc::clone(&executor) as _,
        );
        ctx.dry_run = true;

        assert!(matches!(Wifi.run(&ctx).unwrap(), HandlerResult::DryRun(_)));
        assert!(!wpa_path(dir.path()).exists());
        assert!(!executor.calls().iter().any(|c| c.starts_with("wpa_cli")));
    }
}
