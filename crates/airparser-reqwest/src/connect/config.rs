//! Airparser client configuration.

use std::fmt;
use std::time::Duration;

use airparser_core::credential::{ApiKeyCredential, DEFAULT_BASE_URL};
#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use url::Url;

use crate::{Error, Result};

/// Default timeout for HTTP requests: 30 seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the Airparser HTTP client.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct AirparserConfig {
    /// Airparser API key
    #[cfg_attr(
        feature = "config",
        arg(long = "api-key", env = "AIRPARSER_API_KEY", hide_env_values = true)
    )]
    #[serde(serialize_with = "redact", deserialize_with = "checked_api_key")]
    pub api_key: String,

    /// Base URL of the Airparser API
    #[cfg_attr(
        feature = "config",
        arg(
            long = "base-url",
            env = "AIRPARSER_BASE_URL",
            default_value = DEFAULT_BASE_URL
        )
    )]
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// HTTP request timeout in seconds
    #[cfg_attr(
        feature = "config",
        arg(long = "http-timeout", env = "AIRPARSER_HTTP_TIMEOUT", default_value = "30")
    )]
    #[serde(default = "default_timeout_secs")]
    pub http_timeout: u64,

    /// User-Agent header to send with requests
    #[cfg_attr(
        feature = "config",
        arg(long = "user-agent", env = "AIRPARSER_USER_AGENT")
    )]
    #[serde(default)]
    pub user_agent: Option<String>,
}

const REDACTED: &str = "<redacted>";

fn redact<T: ?Sized, S: Serializer>(_: &T, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(REDACTED)
}

fn checked_api_key<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    let api_key = String::deserialize(deserializer)?;
    ApiKeyCredential::new(api_key.as_str()).map_err(serde::de::Error::custom)?;
    Ok(api_key)
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl fmt::Debug for AirparserConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AirparserConfig")
            .field("api_key", &REDACTED)
            .field("base_url", &self.base_url)
            .field("http_timeout", &self.http_timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl AirparserConfig {
    /// Creates a configuration for the public API with the given key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            http_timeout: default_timeout_secs(),
            user_agent: None,
        }
    }

    /// Set the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the timeout in seconds.
    #[must_use]
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.http_timeout = timeout_secs;
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Returns the effective timeout, using default if zero.
    pub fn effective_timeout(&self) -> Duration {
        if self.http_timeout == 0 {
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        } else {
            Duration::from_secs(self.http_timeout)
        }
    }

    /// Returns the effective user agent, using default if not set.
    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .filter(|ua| !ua.is_empty())
            .unwrap_or_else(Self::default_user_agent)
    }

    /// Returns the default user agent string.
    fn default_user_agent() -> String {
        format!("airparser-rs/{}", env!("CARGO_PKG_VERSION"))
    }

    /// Returns the credential built from the API key.
    pub fn credential(&self) -> Result<ApiKeyCredential> {
        Ok(ApiKeyCredential::new(&self.api_key)?)
    }

    /// Parses the base URL.
    pub fn parsed_base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.base_url)?;
        if url.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl(self.base_url.clone()));
        }
        Ok(url)
    }

    /// Validates the API key and base URL.
    pub fn validate(&self) -> Result<()> {
        self.credential()?;
        self.parsed_base_url()?;
        Ok(())
    }
}
