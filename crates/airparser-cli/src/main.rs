#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod command;
mod config;
mod server;
mod telemetry;

use std::process;

use anyhow::Context;
use airparser_reqwest::AirparserClient;

use crate::config::Cli;

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "airparser_cli::startup";
pub const TRACING_TARGET_SHUTDOWN: &str = "airparser_cli::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "airparser_cli::config";
pub const TRACING_TARGET_COMMAND: &str = "airparser_cli::command";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::debug!(
            target: TRACING_TARGET_SHUTDOWN,
            "Application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = format!("{error:#}"),
            "Application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    telemetry::init_tracing()?;
    cli.log();
    cli.validate()?;

    let service = AirparserClient::new(cli.airparser.clone())
        .context("failed to create Airparser client")?
        .into_service();

    command::dispatch(cli.command, service).await
}
