#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;
mod service;

pub mod credential;
pub mod inbox;
pub mod multipart;
pub mod upload;
pub mod webhook;

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod mock;

pub use error::{BoxedError, Error, ErrorKind, Result};
pub use service::AirparserService;

/// Tracing target for provider calls.
pub const TRACING_TARGET: &str = "airparser_core::service";

/// Tracing target for upload preparation.
pub const TRACING_TARGET_UPLOAD: &str = "airparser_core::upload";

/// Core trait for Airparser API operations.
///
/// Implement this trait to back [`AirparserService`] with a concrete HTTP
/// client. See the `airparser-reqwest` crate.
#[async_trait::async_trait]
pub trait AirparserProvider: Send + Sync {
    /// Uploads a prepared document to its inbox.
    async fn upload(&self, request: &upload::UploadRequest) -> Result<serde_json::Value>;

    /// Subscribes a webhook URL to inbox events.
    async fn subscribe(
        &self,
        request: &webhook::SubscribeRequest,
    ) -> Result<webhook::Subscription>;

    /// Removes a webhook subscription by hook id.
    async fn unsubscribe(&self, hook_id: &str) -> Result<()>;

    /// Lists the inboxes visible to the credential.
    async fn list_inboxes(&self) -> Result<Vec<inbox::Inbox>>;

    /// Runs the credential test request and returns the account.
    async fn verify_credentials(&self) -> Result<serde_json::Value>;
}
