//! Webhook listener configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result as AnyhowResult, anyhow};
use clap::Args;
use url::Url;

use crate::TRACING_TARGET_CONFIG;

/// Path the listener accepts deliveries on.
pub const WEBHOOK_PATH: &str = "/webhook";

/// Webhook listener configuration used by `listen`.
///
/// # Environment Variables
///
/// - `HOST` - Listener host address (default: 127.0.0.1)
/// - `PORT` - Listener port (default: 3000, valid range: 1024-65535)
/// - `AIRPARSER_WEBHOOK_URL` - Public URL Airparser posts events to
/// - `AIRPARSER_WEBHOOK_SECRET` - Expected `x-webhook-secret` header value
/// - `AIRPARSER_STATE_FILE` - File keeping the hook id between runs
/// - `SHUTDOWN_TIMEOUT` - Graceful shutdown timeout in seconds (default: 30, max: 300)
#[derive(Debug, Clone, Args)]
#[must_use = "config does nothing unless you use it"]
pub struct ServerConfig {
    /// Host address to bind the listener to.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// TCP port number for the listener.
    #[arg(short = 'p', long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Public URL of the webhook endpoint as seen by Airparser.
    ///
    /// Defaults to `http://{host}:{port}/webhook`, which only works when
    /// Airparser can reach this machine directly.
    #[arg(long, env = "AIRPARSER_WEBHOOK_URL")]
    pub webhook_url: Option<Url>,

    /// Shared secret expected in the `x-webhook-secret` header.
    #[arg(long, env = "AIRPARSER_WEBHOOK_SECRET", hide_env_values = true)]
    pub webhook_secret: Option<String>,

    /// JSON file that keeps the hook id across restarts.
    ///
    /// Without it the hook id only lives in memory.
    #[arg(long, env = "AIRPARSER_STATE_FILE")]
    pub state_file: Option<PathBuf>,

    /// Seconds allowed after a signal for open deliveries to finish, and
    /// again for removing the subscription.
    #[arg(long, env = "SHUTDOWN_TIMEOUT", default_value_t = 30)]
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            webhook_url: None,
            webhook_secret: None,
            state_file: None,
            shutdown_timeout: 30,
        }
    }
}

impl ServerConfig {
    /// Validates all configuration values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Port is below 1024
    /// - Shutdown timeout is not within 1-300 seconds
    /// - The webhook URL is not http(s)
    /// - The listener binds to all interfaces without a public webhook URL
    pub fn validate(&self) -> AnyhowResult<()> {
        if self.port < 1024 {
            return Err(anyhow!(
                "Port {} is below 1024. Use ports 1024-65535 to avoid requiring root privileges.",
                self.port
            ));
        }

        if self.shutdown_timeout == 0 || self.shutdown_timeout > 300 {
            return Err(anyhow!(
                "Shutdown timeout {} seconds is invalid. Must be between 1 and 300 seconds.",
                self.shutdown_timeout
            ));
        }

        if let Some(url) = &self.webhook_url
            && !matches!(url.scheme(), "http" | "https")
        {
            return Err(anyhow!(
                "Webhook URL {url} must use the http or https scheme."
            ));
        }

        if self.webhook_url.is_none() && self.binds_to_all_interfaces() {
            return Err(anyhow!(
                "A public --webhook-url is required when binding to {}.",
                self.host
            ));
        }

        Ok(())
    }

    /// Returns the socket address to bind to.
    pub fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Returns the bound applied to each shutdown step.
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout)
    }

    /// Returns true if the listener binds to every interface.
    pub fn binds_to_all_interfaces(&self) -> bool {
        self.host.is_unspecified()
    }

    /// Returns the URL registered with Airparser.
    pub fn effective_webhook_url(&self) -> AnyhowResult<Url> {
        if let Some(url) = &self.webhook_url {
            return Ok(url.clone());
        }

        let url = format!("http://{}{WEBHOOK_PATH}", self.server_addr());
        Ok(Url::parse(&url)?)
    }

    /// Logs the listener configuration (the secret is never logged).
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            host = %self.host,
            port = self.port,
            webhook_url = ?self.webhook_url.as_ref().map(Url::as_str),
            has_secret = self.webhook_secret.as_deref().is_some_and(|s| !s.is_empty()),
            state_file = ?self.state_file,
            shutdown_timeout_secs = self.shutdown_timeout,
            "Listener configuration"
        );
    }
}
