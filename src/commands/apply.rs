//! The apply command: load settings and config, then run the handlers.
use std::sync::Arc;

use anyhow::{Result, bail};

use super::CommandSetup;
use crate::cli::Cli;
use crate::exec::{Executor, SystemExecutor};
use crate::handlers::{self, Context};
use crate::logging::Logger;

/// Printed when the boot config file does not exist.
pub const MISSING_CONFIG_HELP: &str = "\
Create the file on the boot partition with one `key = value` per line:

    hostname = kitchen-pi
    wifi_ssid = HomeNetwork
    wifi_password = correct horse battery staple

Recognized keys: hostname, wifi_ssid, wifi_password.
Blank lines and lines starting with `#` are ignored.";

/// Run the apply command against the live system.
///
/// # Errors
///
/// Returns an error if the settings or config cannot be loaded, or if any
/// handler failed.
pub fn run(cli: &Cli, log: &Logger) -> Result<()> {
    run_with_executor(cli, log, Arc::new(SystemExecutor))
}

/// Run the apply command with the given executor.
///
/// # Errors
///
/// Returns an error if the settings or config cannot be loaded, or if any
/// handler failed.
pub fn run_with_executor(cli: &Cli, log: &Logger, executor: Arc<dyn Executor>) -> Result<()> {
    let setup = CommandSetup::init(cli, log)?;
    let ctx = Context::new(
        Arc::new(setup.config),
        Arc::new(setup.settings),
        log.clone(),
        cli.dry_run,
        executor,
    );
    apply(&ctx, &cli.only, &cli.skip)
}

/// Run the selected handlers in registration order.
///
/// # Errors
///
/// Returns an error if `only` / `skip` name an unknown handler, or if one or
/// more handlers failed. Every selected handler runs either way.
pub fn apply(ctx: &Context, only: &[String], skip: &[String]) -> Result<()> {
    let selected = handlers::select(handlers::all_handlers(), only, skip)?;
    let failed = handlers::run_all(&selected, ctx);
    if failed > 0 {
        bail!("{failed} handler(s) failed");
    }
    Ok(())
}
