//! Log output for the `airparser` binary.
//!
//! Command results go to stdout as JSON lines, so every log line goes to
//! stderr. Verbosity comes from `RUST_LOG`, e.g.
//! `RUST_LOG=airparser_reqwest=debug airparser inboxes`.

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Filter applied when `RUST_LOG` is unset.
const DEFAULT_DIRECTIVES: &str = "info";

/// Installs the global subscriber.
pub(crate) fn init_tracing() -> anyhow::Result<()> {
    let filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(&directives)
            .with_context(|| format!("invalid {} value: {directives}", EnvFilter::DEFAULT_ENV))?,
        _ => EnvFilter::new(DEFAULT_DIRECTIVES),
    };

    let stderr = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::IsTerminal::is_terminal(&std::io::stderr()));

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr)
        .try_init()
        .context("a global tracing subscriber is already installed")
}
