//! Boot-time configuration applier for single-board computers.
//!
//! Reads a flat `key = value` file from the boot partition and brings the
//! running system in line with it: hostname (hostname file, kernel hostname,
//! hosts alias) and wireless credentials (supplicant config or a direct
//! ESSID for open networks).
//!
//! The public API is organised into these layers:
//!
//! - **[`config`]**: parse the boot config and the optional TOML settings
//! - **[`resources`]**: idempotent `check + apply` primitives
//! - **[`handlers`]**: the ordered handler list and the dispatcher
//! - **[`commands`]**: the apply command wired to the CLI
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod handlers;
pub mod logging;
pub mod resources;
