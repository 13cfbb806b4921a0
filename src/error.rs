//! Domain-specific error types for the configuration applier.
//!
//! Internal modules return typed errors; handlers and the CLI convert them to
//! [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! ConfigError   : config file and settings loading
//! FileError     : whole-file read/write/backup helpers
//! CommandError  : external command spawn and exit status
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Errors that arise while loading the config file or the settings file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file does not exist. Fatal before any handler runs.
    #[error("configuration file not found: {}", path.display())]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The config file exists but could not be read.
    #[error("IO error reading config file {}: {source}", path.display())]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The settings file is not valid TOML or has unknown fields.
    #[error("invalid settings file {}: {message}", path.display())]
    Settings {
        /// Path to the settings file.
        path: PathBuf,
        /// Parser message.
        message: String,
    },
}

/// Errors from the whole-file helpers in [`crate::resources::file`].
#[derive(Error, Debug)]
pub enum FileError {
    /// The path does not exist.
    #[error("file not found: {}", path.display())]
    NotFound {
        /// Missing path.
        path: PathBuf,
    },

    /// The file exists but could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        /// Path being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file could not be written.
    #[error("cannot write {}: {source}", path.display())]
    Write {
        /// Path being written.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The backup copy could not be created.
    #[error("cannot back up {} to {}: {source}", path.display(), backup.display())]
    Backup {
        /// Original file.
        path: PathBuf,
        /// Backup destination.
        backup: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors from running an external command.
#[derive(Error, Debug)]
pub enum CommandError {
    /// The process could not be started (missing binary, permissions).
    #[error("failed to execute {program}: {source}")]
    Spawn {
        /// Program name.
        program: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The process ran but exited non-zero.
    #[error("{program} failed (exit {code}): {stderr}")]
    Failed {
        /// Program name.
        program: String,
        /// Exit code, `-1` when terminated by a signal.
        code: i32,
        /// Captured standard error, trimmed.
        stderr: String,
        /// Captured standard output, kept so advisory callers can use partial output.
        stdout: String,
    },
}
