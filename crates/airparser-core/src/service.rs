//! Provider wrapper with observability.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;

use crate::inbox::Inbox;
use crate::upload::UploadRequest;
use crate::webhook::{SubscribeRequest, Subscription};
use crate::{AirparserProvider, Result, TRACING_TARGET};

/// Airparser service wrapper with observability.
///
/// This wrapper adds structured logging to any [`AirparserProvider`]
/// implementation. The inner provider is wrapped in `Arc` for cheap cloning.
#[derive(Clone)]
pub struct AirparserService {
    inner: Arc<dyn AirparserProvider>,
}

impl fmt::Debug for AirparserService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AirparserService").finish_non_exhaustive()
    }
}

impl AirparserService {
    /// Create a new service wrapper.
    pub fn new<P>(provider: P) -> Self
    where
        P: AirparserProvider + 'static,
    {
        Self {
            inner: Arc::new(provider),
        }
    }

    /// Uploads a prepared document.
    pub async fn upload(&self, request: &UploadRequest) -> Result<Value> {
        let started_at = Instant::now();

        tracing::debug!(
            target: TRACING_TARGET,
            inbox_id = %request.inbox_id,
            body_len = request.body.len(),
            "Uploading document"
        );

        let result = self.inner.upload(request).await;
        log_outcome("upload", &result, started_at);
        result
    }

    /// Subscribes a webhook URL to inbox events.
    pub async fn subscribe(&self, request: &SubscribeRequest) -> Result<Subscription> {
        let started_at = Instant::now();

        tracing::debug!(
            target: TRACING_TARGET,
            inbox_id = %request.inbox_id,
            event = %request.event,
            hook_url = %request.hook_url,
            "Subscribing webhook"
        );

        let result = self.inner.subscribe(request).await;
        log_outcome("subscribe", &result, started_at);
        result
    }

    /// Removes a webhook subscription.
    pub async fn unsubscribe(&self, hook_id: &str) -> Result<()> {
        let started_at = Instant::now();

        tracing::debug!(
            target: TRACING_TARGET,
            hook_id = %hook_id,
            "Unsubscribing webhook"
        );

        let result = self.inner.unsubscribe(hook_id).await;
        log_outcome("unsubscribe", &result, started_at);
        result
    }

    /// Lists the inboxes visible to the credential.
    pub async fn list_inboxes(&self) -> Result<Vec<Inbox>> {
        let started_at = Instant::now();
        let result = self.inner.list_inboxes().await;
        log_outcome("list_inboxes", &result, started_at);
        result
    }

    /// Runs the credential test request.
    pub async fn verify_credentials(&self) -> Result<Value> {
        let started_at = Instant::now();
        let result = self.inner.verify_credentials().await;
        log_outcome("verify_credentials", &result, started_at);
        result
    }
}

fn log_outcome<T>(operation: &'static str, result: &Result<T>, started_at: Instant) {
    let elapsed = started_at.elapsed();

    match result {
        Ok(_) => {
            tracing::debug!(
                target: TRACING_TARGET,
                operation,
                elapsed_ms = elapsed.as_millis(),
                "Airparser call succeeded"
            );
        }
        Err(error) => {
            tracing::error!(
                target: TRACING_TARGET,
                operation,
                error = %error,
                retryable = error.is_retryable(),
                elapsed_ms = elapsed.as_millis(),
                "Airparser call failed"
            );
        }
    }
}
