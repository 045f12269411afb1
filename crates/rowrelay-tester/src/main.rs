//! Entry point for the `rowrelay-tester` binary.

mod cli;
mod error;
mod logging;
mod scenarios;

use std::process;

use clap::Parser;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, registry};

use crate::{
    cli::{Cli, Commands},
    error::Result,
};

fn main() {
    if let Err(err) = run() {
        error!("{err}");
        eprintln!("error: {err}");
        process::exit(1);
    }
}

/// Parse CLI arguments, install logging, and dispatch to the chosen
/// scenario on a single-threaded runtime — the same cooperative model the
/// engine runs under in a page.
fn run() -> Result<()> {
    let Cli { log, command } = Cli::parse();
    let spec = logging::compute_spec(&log);
    registry()
        .with(logging::env_filter_from_spec(&spec))
        .with(fmt::layer().without_time())
        .try_init()
        .ok();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(async {
        match command {
            Commands::Move(args) => scenarios::run_move(&args).await,
            Commands::Exhaust(args) => scenarios::run_exhaust(&args).await,
            Commands::Menu(args) => scenarios::run_menu(&args).await,
            Commands::Matrix(args) => scenarios::run_matrix(&args).await,
        }
    })
}
