//! API key credential for the Airparser API.

use std::fmt;

use serde::Deserialize;

use crate::{Error, Result};

/// Header that carries the API key on every request.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Base URL of the public Airparser API.
pub const DEFAULT_BASE_URL: &str = "https://api.airparser.com";

/// Endpoint used to test a credential (`GET`).
pub const CREDENTIAL_TEST_PATH: &str = "/users/me";

/// An Airparser API key.
///
/// The key never appears in `Debug` output and cannot be serialized.
/// Deserializing goes through [`ApiKeyCredential::new`].
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct ApiKeyCredential {
    api_key: String,
}

impl ApiKeyCredential {
    /// Creates a credential from a non-empty API key.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error when the key is empty or blank.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::configuration().with_message("Airparser API key is required"));
        }
        Ok(Self { api_key })
    }

    /// Returns the header name and value used to authenticate a request.
    pub fn header(&self) -> (&'static str, &str) {
        (API_KEY_HEADER, &self.api_key)
    }

    /// Returns the raw API key.
    pub fn expose(&self) -> &str {
        &self.api_key
    }
}

impl TryFrom<String> for ApiKeyCredential {
    type Error = Error;

    fn try_from(api_key: String) -> Result<Self> {
        Self::new(api_key)
    }
}

impl fmt::Debug for ApiKeyCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyCredential")
            .field("api_key", &"<redacted>")
            .finish()
    }
}
