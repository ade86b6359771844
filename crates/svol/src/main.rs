#![warn(missing_docs)]

//! Entry point for the `svol` binary.

mod cli;

use std::{io, process};

use clap::Parser;
use svol::{Outcome, Result, Settings, SystemRunner, VolumeController};
use tracing::{debug, error};
use tracing_subscriber::{fmt, prelude::*, registry};

use crate::cli::Cli;

fn main() {
    if let Err(err) = run() {
        error!("{err}");
        eprintln!("error: {err}");
        process::exit(1);
    }
}

/// Parse CLI arguments, install logging, and apply the requested change.
fn run() -> Result<()> {
    let cli = Cli::parse();
    let env_filter = logging::env_filter_from_spec(&cli.log.spec());
    registry()
        .with(env_filter)
        .with(fmt::layer().without_time().with_writer(io::stderr))
        .try_init()
        .ok();

    let mut settings = Settings::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut settings);
    debug!(?settings, "effective settings");

    let controller = VolumeController::new(SystemRunner, settings);
    match controller.apply(cli.command.operation())? {
        Outcome::Notified { id, replaced } => debug!(id, replaced, "done"),
        Outcome::Skipped(reason) => debug!(?reason, "done without notification"),
        Outcome::NotifyFailed(err) => debug!(error = %err, "done, notification failed"),
    }
    Ok(())
}
