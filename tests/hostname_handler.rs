#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing
)]
//! Integration tests for the hostname handler against a temporary root.

mod common;

use std::sync::Arc;

use bootconfig::handlers::{self, Handler, HandlerResult, hostname::Hostname};
use common::{RecordingExecutor, TestSystemBuilder};

const STOCK_HOSTS: &str = "127.0.0.1\tlocalhost\n::1\t\tlocalhost ip6-localhost\n\n127.0.1.1\traspberrypi\n";

/// The second run with unchanged inputs writes nothing and runs no
/// mutating command.
#[test]
fn second_run_is_a_no_op() {
    let system = TestSystemBuilder::new()
        .config("hostname = kitchen\n")
        .hostname("raspberrypi")
        .hosts(STOCK_HOSTS)
        .service_manager()
        .build();
    let executor = Arc::new(
        RecordingExecutor::new()
            .respond("hostname", "raspberrypi\n")
            .respond("systemctl", ""),
    );

    let ctx = system.context(Arc::clone(&executor) as _, false);
    Hostname.run(&ctx).unwrap();
    assert_eq!(system.read("etc/hostname"), "kitchen\n");
    assert!(
        executor
            .calls()
            .contains(&"systemctl restart avahi-daemon".to_string())
    );

    let hosts_after_first = system.read("etc/hosts");
    let modified = std::fs::metadata(system.path("etc/hosts"))
        .unwrap()
        .modified()
        .unwrap();

    executor.set_response("hostname", "kitchen\n");
    executor.clear();
    let ctx = system.context(Arc::clone(&executor) as _, false);
    let result = Hostname.run(&ctx).unwrap();

    assert_eq!(
        result,
        HandlerResult::Ok(vec!["0 changed, 3 already ok".to_string()])
    );
    assert_eq!(executor.calls(), vec!["hostname"]);
    assert_eq!(system.read("etc/hosts"), hosts_after_first);
    assert_eq!(
        std::fs::metadata(system.path("etc/hosts"))
            .unwrap()
            .modified()
            .unwrap(),
        modified
    );
}

#[test]
fn alias_line_is_replaced_in_place() {
    let system = TestSystemBuilder::new()
        .config("hostname=kitchen\n")
        .hostname("raspberrypi")
        .hosts(STOCK_HOSTS)
        .build();
    let executor = Arc::new(RecordingExecutor::new().respond("hostname", "raspberrypi\n"));

    Hostname
        .run(&system.context(executor as _, false))
        .unwrap();

    let hosts = system.read("etc/hosts");
    assert_eq!(
        hosts,
        "127.0.0.1\tlocalhost\n::1\t\tlocalhost ip6-localhost\n\n127.0.1.1\tkitchen\n"
    );
    assert!(!hosts.contains("raspberrypi"));
}

#[test]
fn unrelated_loopback_alias_survives_a_rename() {
    let system = TestSystemBuilder::new()
        .config("hostname=kitchen\n")
        .hostname("raspberrypi")
        .hosts("127.0.0.1\tlocalhost\n127.0.1.1\tmy-nas\n")
        .build();
    let executor = Arc::new(RecordingExecutor::new().respond("hostname", "raspberrypi\n"));

    Hostname
        .run(&system.context(executor as _, false))
        .unwrap();

    let hosts = system.read("etc/hosts");
    assert!(hosts.contains("127.0.1.1\tmy-nas\n"));
    assert!(hosts.ends_with("127.0.1.1\tkitchen\n"));
}

#[test]
fn existing_entry_with_extra_aliases_is_left_alone() {
    let hosts = "127.0.0.1\tlocalhost\n127.0.1.1\tkitchen kitchen.local\n";
    let system = TestSystemBuilder::new()
        .config("hostname=kitchen\n")
        .hostname("raspberrypi")
        .hosts(hosts)
        .build();
    let executor = Arc::new(RecordingExecutor::new().respond("hostname", "kitchen\n"));

    Hostname
        .run(&system.context(executor as _, false))
        .unwrap();

    assert_eq!(system.read("etc/hosts"), hosts);
}

#[test]
fn alias_line_is_appended_once_across_runs() {
    let system = TestSystemBuilder::new()
        .config("hostname=kitchen\n")
        .hostname("kitchen")
        .hosts("127.0.0.1\tlocalhost")
        .build();
    let executor = Arc::new(RecordingExecutor::new().respond("hostname", "kitchen\n"));

    for _ in 0..3 {
        Hostname
            .run(&system.context(Arc::clone(&executor) as _, false))
            .unwrap();
    }

    assert_eq!(
        system.read("etc/hosts"),
        "127.0.0.1\tlocalhost\n127.0.1.1\tkitchen\n"
    );
}

#[test]
fn missing_hosts_file_fails_only_this_handler() {
    let system = TestSystemBuilder::new()
        .config("hostname=kitchen\n")
        .hostname("raspberrypi")
        .build();
    let executor = Arc::new(RecordingExecutor::new().respond("hostname", "raspberrypi\n"));
    let ctx = system.context(executor as _, false);

    let selected = handlers::select(
        handlers::all_handlers(),
        &["hostname".to_string(), "wifi".to_string()],
        &[],
    )
    .unwrap();
    let failed = handlers::run_all(&selected, &ctx);

    assert_eq!(failed, 1);
    let entries = ctx.log.handler_entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].name, "wifi");
    assert_eq!(system.read("etc/hostname"), "kitchen\n");
}
