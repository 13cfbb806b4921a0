//! Command-line interface.
use std::path::PathBuf;

use clap::Parser;

/// Version reported by `--version` and written to the log file header.
pub const VERSION: &str = match option_env!("BOOTCONFIG_VERSION") {
    Some(version) => version,
    None => env!("CARGO_PKG_VERSION"),
};

/// Apply the boot partition's `key = value` settings to the running system.
#[derive(Parser, Debug)]
#[command(
    name = "bootconfig",
    about = "Apply boot-time configuration (hostname, wifi) to the running system",
    version = VERSION
)]
pub struct Cli {
    /// Config file to apply [default: /boot/bootconfig.txt under the settings root]
    #[arg(short, long, env = "BOOTCONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Settings file locating the system files [default: /etc/bootconfig/settings.toml]
    #[arg(short, long, env = "BOOTCONFIG_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Preview changes without applying
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Append every log line to this file
    #[arg(long, env = "BOOTCONFIG_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Run only these handlers
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,

    /// Skip these handlers
    #[arg(long, value_delimiter = ',')]
    pub skip: Vec<String>,
}
