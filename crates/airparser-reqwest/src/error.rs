//! Internal error types for airparser-reqwest.

use thiserror::Error;

/// Result type alias for airparser-reqwest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Internal error type for airparser-reqwest operations.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// The base URL could not be parsed.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
    /// The base URL cannot carry path segments.
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
    /// A header value contained bytes HTTP does not allow.
    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
    /// A header name contained bytes HTTP does not allow.
    #[error("Invalid header name: {0}")]
    InvalidHeaderName(#[from] reqwest::header::InvalidHeaderName),
    /// The API answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// Response status code.
        status: u16,
        /// Truncated response body.
        body: String,
    },
    /// Error raised by the core crate.
    #[error(transparent)]
    Core(#[from] airparser_core::Error),
}

impl From<Error> for airparser_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Reqwest(e) => {
                if e.is_timeout() {
                    airparser_core::Error::timeout()
                        .with_message(e.to_string())
                        .with_source(e)
                } else if e.is_connect() {
                    airparser_core::Error::network_error()
                        .with_message("Connection failed")
                        .with_source(e)
                } else if e.is_decode() {
                    airparser_core::Error::serialization()
                        .with_message(e.to_string())
                        .with_source(e)
                } else {
                    airparser_core::Error::network_error()
                        .with_message(e.to_string())
                        .with_source(e)
                }
            }
            Error::Serde(e) => airparser_core::Error::serialization()
                .with_message(e.to_string())
                .with_source(e),
            Error::Url(e) => airparser_core::Error::configuration()
                .with_message("Invalid base URL")
                .with_source(e),
            Error::InvalidBaseUrl(url) => airparser_core::Error::configuration()
                .with_message(format!("Base URL cannot be a base: {url}")),
            Error::InvalidHeader(e) => airparser_core::Error::configuration()
                .with_message("API key is not a valid header value")
                .with_source(e),
            Error::InvalidHeaderName(e) => airparser_core::Error::internal_error()
                .with_message("Invalid API key header name")
                .with_source(e),
            Error::Status { status, body } => {
                let error = airparser_core::Error::from_status(status);
                if body.is_empty() {
                    error
                } else {
                    error.with_message(body)
                }
            }
            Error::Core(e) => e,
        }
    }
}
