//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── airparser: AirparserConfig   # API key, base URL, timeout, user agent
//! └── command: Command             # whoami | inboxes | import-file | import-html | listen
//!     └── listen
//!         └── server: ServerConfig # Host, port, webhook URL, secret, state file
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//! Use `--help` to see all available options.

mod server;

use std::process;

use airparser_reqwest::AirparserConfig;
use anyhow::Context;
use clap::Parser;
pub use server::{ServerConfig, WEBHOOK_PATH};

use crate::command::Command;
use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "airparser")]
#[command(about = "Upload documents to Airparser and receive parsed results")]
#[command(version)]
pub struct Cli {
    /// Airparser API connection configuration.
    #[command(flatten)]
    pub airparser: AirparserConfig,

    /// Operation to run.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.airparser
            .validate()
            .map_err(airparser_core::Error::from)
            .context("invalid Airparser configuration")?;

        if let Command::Listen(args) = &self.command {
            args.server
                .validate()
                .context("invalid server configuration")?;
        }

        Ok(())
    }

    /// Logs configuration (no sensitive information).
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );

        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            base_url = %self.airparser.base_url,
            timeout_secs = self.airparser.effective_timeout().as_secs(),
            user_agent = %self.airparser.effective_user_agent(),
            command = self.command.name(),
            "Airparser configuration"
        );

        if let Command::Listen(args) = &self.command {
            args.server.log();
        }
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_and_subcommand_args() {
        let cli = Cli::try_parse_from([
            "airparser",
            "--api-key",
            "key",
            "--http-timeout",
            "5",
            "import-html",
            "--inbox",
            "inbox-1",
            "--content",
            "<p>hi</p>",
        ])
        .unwrap();

        assert_eq!(cli.airparser.api_key, "key");
        assert_eq!(cli.airparser.http_timeout, 5);
        assert_eq!(cli.command.name(), "import-html");
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_key() {
        let cli = Cli::try_parse_from(["airparser", "--api-key", " ", "whoami"]).unwrap();
        assert!(cli.validate().is_err());
    }

    #[test]
    fn validate_checks_listen_server() {
        let cli = Cli::try_parse_from([
            "airparser",
            "--api-key",
            "key",
            "listen",
            "--inbox",
            "inbox-1",
            "--port",
            "80",
        ])
        .unwrap();
        assert!(cli.validate().is_err());
    }
}
