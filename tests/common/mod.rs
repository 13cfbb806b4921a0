// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed system root and a fluent builder so
// each integration test can lay out `/etc` and `/boot` without repeating
// filesystem boilerplate, plus a recording executor standing in for the OS
// tools.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code, clippy::expect_used)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use bootconfig::config::Config;
use bootconfig::config::settings::Settings;
use bootconfig::error::CommandError;
use bootconfig::exec::{ExecResult, Executor};
use bootconfig::handlers::Context;
use bootconfig::logging::Logger;

/// `iw dev` output for a board with one wireless interface.
pub const IW_DEV_WLAN0: &str = "phy#0\n\tInterface wlan0\n\t\tifindex 3\n\t\ttype managed\n";

/// Executor that answers from a table and records every command line.
///
/// Responses are looked up by full command line first, then by program.
/// Unknown programs fail to spawn.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    outputs: Mutex<HashMap<String, String>>,
    calls: Mutex<Vec<String>>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `command` (a program or full command line) with `stdout`.
    pub fn respond(self, command: &str, stdout: &str) -> Self {
        self.set_response(command, stdout);
        self
    }

    /// Change a response between runs (e.g. the live hostname after a set).
    pub fn set_response(&self, command: &str, stdout: &str) {
        self.outputs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(command.to_string(), stdout.to_string());
    }

    /// Every command issued so far, as `program arg1 arg2`.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Forget recorded calls.
    pub fn clear(&self) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Executor for RecordingExecutor {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult, CommandError> {
        self.run_unchecked(program, args)
    }

    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult, CommandError> {
        let line = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.clone());
        let outputs = self.outputs.lock().unwrap_or_else(PoisonError::into_inner);
        match outputs.get(&line).or_else(|| outputs.get(program)) {
            Some(stdout) => Ok(ExecResult {
                stdout: stdout.clone(),
                stderr: String::new(),
                success: true,
                code: Some(0),
            }),
            None => Err(CommandError::Spawn {
                program: program.to_string(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            }),
        }
    }

    fn which(&self, program: &str) -> bool {
        self.outputs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .any(|command| command.split(' ').next() == Some(program))
    }
}

/// An isolated system root backed by a [`tempfile::TempDir`].
pub struct TestSystem {
    pub root: tempfile::TempDir,
}

impl TestSystem {
    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    /// Absolute path of `relative` under the root.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    /// Read a file under the root.
    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.path(relative)).expect("read file under test root")
    }

    /// Replace the boot config.
    pub fn write_config(&self, content: &str) {
        write(&self.path("boot/bootconfig.txt"), content);
    }

    /// Settings pointing every system file into this root.
    pub fn settings(&self) -> Settings {
        Settings::with_root(self.root.path())
    }

    /// Load the boot config and build a handler context around `executor`.
    pub fn context(&self, executor: Arc<dyn Executor>, dry_run: bool) -> Context {
        let settings = self.settings();
        let config = Config::load(&settings.config_path()).expect("load boot config");
        Context::new(
            Arc::new(config),
            Arc::new(settings),
            Logger::new(),
            dry_run,
            executor,
        )
    }
}

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(path, content).expect("write test file");
}

/// Fluent builder for [`TestSystem`].
pub struct TestSystemBuilder {
    system: TestSystem,
}

impl TestSystemBuilder {
    /// Begin with an empty root holding only a version file.
    pub fn new() -> Self {
        let system = TestSystem {
            root: tempfile::tempdir().expect("create temp dir"),
        };
        write(&system.path("etc/debian_version"), "12.5\n");
        Self { system }
    }

    /// Write the boot config.
    pub fn config(self, content: &str) -> Self {
        self.system.write_config(content);
        self
    }

    /// Write `/etc/hostname`.
    pub fn hostname(self, name: &str) -> Self {
        write(&self.system.path("etc/hostname"), &format!("{name}\n"));
        self
    }

    /// Write `/etc/hosts`.
    pub fn hosts(self, content: &str) -> Self {
        write(&self.system.path("etc/hosts"), content);
        self
    }

    /// Write the supplicant config.
    pub fn wpa_supplicant(self, content: &str) -> Self {
        write(
            &self.system.path("etc/wpa_supplicant/wpa_supplicant.conf"),
            content,
        );
        self
    }

    /// Create the service-manager marker directory.
    pub fn service_manager(self) -> Self {
        std::fs::create_dir_all(self.system.path("run/systemd/system"))
            .expect("create service marker");
        self
    }

    /// Finalise and return the built [`TestSystem`].
    pub fn build(self) -> TestSystem {
        self.system
    }
}
