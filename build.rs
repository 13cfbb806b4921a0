//! Build script: embeds the bootconfig version string.

use std::process::Command;

fn main() {
    // Prefer BOOTCONFIG_VERSION if set (e.g. by the package build), otherwise
    // fall back to git describe for local development builds.
    if let Ok(version) = std::env::var("BOOTCONFIG_VERSION") {
        println!("cargo:rustc-env=BOOTCONFIG_VERSION={version}");
    } else if let Ok(output) = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        && output.status.success()
    {
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        println!("cargo:rustc-env=BOOTCONFIG_VERSION={version}");
    }

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
    println!("cargo:rerun-if-env-changed=BOOTCONFIG_VERSION");
}
