// EN: src/bin/xopen.rs

use anyhow::Result;
use clap::Parser;
use colored::*;
use xopen::cli::{Cli, handlers};

/// The main entry point of the `xopen` application.
/// It sets up logging, parses arguments, runs the handler,
/// and performs centralized error handling.
fn main() {
    // Parser diagnostics are warnings, so they must show without RUST_LOG.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    if let Err(e) = run_cli(Cli::parse()) {
        eprintln!("{}: {}", xopen::t!("cli.error.label").red().bold(), e);
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);
    handlers::plan::handle(&cli)
}
