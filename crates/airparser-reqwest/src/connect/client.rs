//! Reqwest-based HTTP client for the Airparser API.

use std::sync::Arc;

use airparser_core::AirparserService;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Response};
use url::Url;

use super::AirparserConfig;
use crate::error::{Error, Result};

/// Tracing target for client operations.
pub const TRACING_TARGET: &str = "airparser_reqwest::client";

/// Maximum number of characters of an error body kept in error messages.
const MAX_ERROR_BODY_CHARS: usize = 1024;

/// Inner client that holds the HTTP client and configuration.
struct AirparserClientInner {
    http: Client,
    base_url: Url,
    config: AirparserConfig,
}

/// Reqwest-based client for the Airparser API.
///
/// Every request carries the `X-API-Key` header built from the configured
/// key. The client is cheap to clone.
///
/// # Examples
///
/// ```rust,ignore
/// use airparser_reqwest::{AirparserClient, AirparserConfig};
///
/// let client = AirparserClient::new(AirparserConfig::new("my-key"))?;
/// let service = client.into_service();
/// let account = service.verify_credentials().await?;
/// ```
#[derive(Clone)]
pub struct AirparserClient {
    inner: Arc<AirparserClientInner>,
}

impl std::fmt::Debug for AirparserClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AirparserClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl AirparserClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is blank, the base URL is invalid, or
    /// the HTTP client cannot be created.
    pub fn new(config: AirparserConfig) -> Result<Self> {
        let timeout = config.effective_timeout();
        let user_agent = config.effective_user_agent();

        tracing::debug!(
            target: TRACING_TARGET,
            base_url = %config.base_url,
            timeout_ms = timeout.as_millis(),
            "Creating Airparser client"
        );

        let credential = config.credential()?;
        let base_url = config.parsed_base_url()?;

        let (name, value) = credential.header();
        let mut value = HeaderValue::from_str(value)?;
        value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_bytes(name.as_bytes())?, value);

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(&user_agent)
            .default_headers(headers)
            .build()?;

        let inner = AirparserClientInner {
            http,
            base_url,
            config,
        };

        tracing::info!(
            target: TRACING_TARGET,
            base_url = %inner.base_url,
            "Airparser client created successfully"
        );

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Gets the underlying HTTP client.
    pub(crate) fn http(&self) -> &Client {
        &self.inner.http
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &AirparserConfig {
        &self.inner.config
    }

    /// Gets the parsed base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Converts this client into an [`AirparserService`] for use with
    /// dependency injection.
    pub fn into_service(self) -> AirparserService {
        AirparserService::new(self)
    }

    /// Builds an endpoint URL by appending percent-encoded path segments to
    /// the base URL.
    pub(crate) fn endpoint<'a>(
        &self,
        segments: impl IntoIterator<Item = &'a str>,
    ) -> Result<Url> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidBaseUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Checks the status of a response and decodes its JSON body.
    ///
    /// An empty success body decodes to `null` and a success body that is
    /// not JSON is returned as a string.
    pub(crate) async fn read_json(response: Response) -> Result<serde_json::Value> {
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes)
                .chars()
                .take(MAX_ERROR_BODY_CHARS)
                .collect();
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::Value::Null);
        }

        let value = serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned())
        });
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> AirparserClient {
        AirparserClient::new(AirparserConfig::new("key").with_base_url(base_url)).unwrap()
    }

    #[test]
    fn test_client_creation() {
        let client = client("https://api.airparser.com");
        assert_eq!(client.base_url().as_str(), "https://api.airparser.com/");
        assert!(client.config().user_agent.is_none());
    }

    #[test]
    fn test_client_rejects_blank_key() {
        assert!(AirparserClient::new(AirparserConfig::new("  ")).is_err());
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let client = client("https://api.airparser.com");
        let url = client
            .endpoint(["inboxes", "a/b c", "upload", "n8n"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.airparser.com/inboxes/a%2Fb%20c/upload/n8n"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = client("http://127.0.0.1:8080/api/");
        let url = client.endpoint(["users", "me"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/api/users/me");
    }

    #[test]
    fn test_debug_hides_key() {
        let client = AirparserClient::new(AirparserConfig::new("super-secret")).unwrap();
        assert!(!format!("{client:?}").contains("super-secret"));
    }
}
