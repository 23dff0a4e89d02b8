//! Error type shared by every Airparser crate.
//!
//! An [`Error`] carries an [`ErrorKind`] that callers can branch on, an
//! optional human-readable message, the underlying cause and a short
//! context string such as the HTTP status or the offending file path.

use strum::{AsRefStr, Display, EnumString, IntoStaticStr};
use thiserror::Error;

/// Boxed cause attached to an [`Error`].
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Result alias defaulting to [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// What went wrong, independent of where.
///
/// The string form (`invalid_input`, `rate_limited`, ...) is stable and is
/// what appears in log fields and in the error's `Display` output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// A parameter was rejected before any request was sent
    /// (empty inbox id, metadata that is not an object, bad boundary).
    InvalidInput,
    /// The request never got a response.
    NetworkError,
    /// `401`: the API key was not accepted.
    Authentication,
    /// `403`: the API key cannot access the inbox.
    Authorization,
    /// `429`: too many requests for this key.
    RateLimited,
    /// `503`: Airparser is temporarily down.
    ServiceUnavailable,
    /// A local failure such as file I/O.
    InternalError,
    /// Airparser answered with a server error.
    ExternalError,
    /// The client or listener is misconfigured.
    Configuration,
    /// `404`: unknown inbox or hook.
    NotFound,
    /// The request or the response took too long.
    Timeout,
    /// A body could not be encoded or decoded as JSON.
    Serialization,
    #[default]
    Unknown,
}

impl ErrorKind {
    /// Whether sending the same request again could succeed.
    ///
    /// Nothing in this workspace retries on its own.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NetworkError | Self::Timeout | Self::ServiceUnavailable | Self::RateLimited
        )
    }

    /// Classifies a non-success HTTP status returned by the API.
    #[must_use]
    pub const fn from_status(status: u16) -> Self {
        match status {
            401 => Self::Authentication,
            403 => Self::Authorization,
            404 => Self::NotFound,
            408 => Self::Timeout,
            429 => Self::RateLimited,
            503 => Self::ServiceUnavailable,
            400..=499 => Self::InvalidInput,
            500..=599 => Self::ExternalError,
            _ => Self::Unknown,
        }
    }
}

/// An Airparser operation failure.
#[must_use]
#[derive(Debug, Error)]
#[error("[{kind}]{}", message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
pub struct Error {
    /// Classification used for matching and retry decisions.
    pub kind: ErrorKind,
    /// Description shown to the user.
    pub message: Option<String>,
    /// Underlying cause.
    #[source]
    pub source: Option<BoxedError>,
    /// Where it happened, e.g. `HTTP 401` or a file path.
    pub context: Option<String>,
}

macro_rules! kind_constructors {
    ($($(#[$doc:meta])* $name:ident => $kind:ident;)*) => {
        $(
            $(#[$doc])*
            pub fn $name() -> Self {
                Self::new(ErrorKind::$kind)
            }
        )*
    };
}

impl Error {
    /// An error of `kind` with nothing attached.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            source: None,
            context: None,
        }
    }

    /// An error of `kind` caused by `source`.
    pub fn from_source(kind: ErrorKind, source: impl Into<BoxedError>) -> Self {
        Self::new(kind).with_source(source)
    }

    /// An error for a non-success API response, with `HTTP <status>` as context.
    pub fn from_status(status: u16) -> Self {
        Self::new(ErrorKind::from_status(status)).with_context(format!("HTTP {status}"))
    }

    kind_constructors! {
        /// Shorthand for [`ErrorKind::InvalidInput`].
        invalid_input => InvalidInput;
        /// Shorthand for [`ErrorKind::NetworkError`].
        network_error => NetworkError;
        /// Shorthand for [`ErrorKind::InternalError`].
        internal_error => InternalError;
        /// Shorthand for [`ErrorKind::Configuration`].
        configuration => Configuration;
        /// Shorthand for [`ErrorKind::Timeout`].
        timeout => Timeout;
        /// Shorthand for [`ErrorKind::Serialization`].
        serialization => Serialization;
    }

    /// Sets the message.
    pub fn with_message(self, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..self
        }
    }

    /// Sets the cause.
    pub fn with_source(self, source: impl Into<BoxedError>) -> Self {
        Self {
            source: Some(source.into()),
            ..self
        }
    }

    /// Sets the context.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self {
            context: Some(context.into()),
            ..self
        }
    }

    /// See [`ErrorKind::is_retryable`].
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        let kind = match error.kind() {
            std::io::ErrorKind::TimedOut => ErrorKind::Timeout,
            _ => ErrorKind::InternalError,
        };
        Self::from_source(kind, error).with_message("file operation failed")
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::from_source(ErrorKind::Serialization, error).with_message("invalid JSON")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_error_displays_kind_only() {
        let error = Error::timeout();
        assert_eq!(error.to_string(), "[timeout]");
        assert!(error.source.is_none());
    }

    #[test]
    fn message_follows_kind_in_display() {
        let error = Error::invalid_input()
            .with_message("inbox id is empty")
            .with_context("import-file");
        assert_eq!(error.to_string(), "[invalid_input]: inbox id is empty");
        assert_eq!(error.context.as_deref(), Some("import-file"));
    }

    #[test]
    fn io_errors_are_internal() {
        let error = Error::from(std::io::Error::from(std::io::ErrorKind::NotFound));
        assert_eq!(error.kind, ErrorKind::InternalError);
        assert!(error.source.is_some());
    }

    #[test]
    fn bad_json_is_a_serialization_error() {
        let cause = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(Error::from(cause).kind, ErrorKind::Serialization);
    }

    #[test]
    fn api_statuses_map_to_kinds() {
        let cases = [
            (400, ErrorKind::InvalidInput),
            (401, ErrorKind::Authentication),
            (403, ErrorKind::Authorization),
            (404, ErrorKind::NotFound),
            (408, ErrorKind::Timeout),
            (422, ErrorKind::InvalidInput),
            (429, ErrorKind::RateLimited),
            (500, ErrorKind::ExternalError),
            (503, ErrorKind::ServiceUnavailable),
            (302, ErrorKind::Unknown),
        ];
        for (status, kind) in cases {
            assert_eq!(ErrorKind::from_status(status), kind, "HTTP {status}");
        }
        assert_eq!(Error::from_status(401).context.as_deref(), Some("HTTP 401"));
    }

    #[test]
    fn kind_names_are_snake_case() {
        assert_eq!(ErrorKind::RateLimited.as_ref(), "rate_limited");
        assert_eq!("not_found".parse::<ErrorKind>().ok(), Some(ErrorKind::NotFound));
        assert!("NotFound".parse::<ErrorKind>().is_err());
    }

    #[test]
    fn only_transient_failures_are_retryable() {
        assert!(Error::network_error().is_retryable());
        assert!(Error::from_status(429).is_retryable());
        assert!(Error::from_status(503).is_retryable());
        assert!(!Error::from_status(401).is_retryable());
        assert!(!Error::from_status(500).is_retryable());
        assert!(!Error::configuration().is_retryable());
    }
}
