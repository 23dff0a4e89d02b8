//! Airparser provider implementation.
//!
//! This module implements the [`AirparserProvider`] trait for
//! [`AirparserClient`].

use airparser_core::credential::CREDENTIAL_TEST_PATH;
use airparser_core::inbox::Inbox;
use airparser_core::upload::UploadRequest;
use airparser_core::webhook::{SubscribeRequest, Subscription, UnsubscribeRequest};
use airparser_core::AirparserProvider;
use reqwest::header::CONTENT_TYPE;

use crate::connect::{AirparserClient, TRACING_TARGET};
use crate::error::Error;

#[async_trait::async_trait]
impl AirparserProvider for AirparserClient {
    async fn upload(&self, request: &UploadRequest) -> airparser_core::Result<serde_json::Value> {
        let url = self.endpoint(request.path_segments())?;

        tracing::debug!(
            target: TRACING_TARGET,
            inbox_id = %request.inbox_id,
            body_bytes = request.body.len(),
            "Uploading document"
        );

        let response = self
            .http()
            .post(url)
            .header(CONTENT_TYPE, request.content_type())
            .body(request.body.body().clone())
            .send()
            .await
            .map_err(Error::from)?;

        let value = Self::read_json(response).await?;

        tracing::debug!(
            target: TRACING_TARGET,
            inbox_id = %request.inbox_id,
            "Document uploaded"
        );

        Ok(value)
    }

    async fn subscribe(
        &self,
        request: &SubscribeRequest,
    ) -> airparser_core::Result<Subscription> {
        let url = self.endpoint(["n8n", "subscribe"])?;

        tracing::debug!(
            target: TRACING_TARGET,
            inbox_id = %request.inbox_id,
            hook_url = %request.hook_url,
            event = %request.event,
            "Subscribing webhook"
        );

        let response = self
            .http()
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(Error::from)?;

        let value = Self::read_json(response).await?;

        // A body that is not an object counts as a subscription without id.
        let subscription = serde_json::from_value::<Subscription>(value).unwrap_or_default();

        tracing::debug!(
            target: TRACING_TARGET,
            hook_id = ?subscription.id,
            "Webhook subscribed"
        );

        Ok(subscription)
    }

    async fn unsubscribe(&self, hook_id: &str) -> airparser_core::Result<()> {
        let url = self.endpoint(["n8n", "unsubscribe"])?;
        let body = UnsubscribeRequest {
            hook_id: hook_id.to_owned(),
        };

        tracing::debug!(
            target: TRACING_TARGET,
            hook_id,
            "Unsubscribing webhook"
        );

        let response = self
            .http()
            .delete(url)
            .json(&body)
            .send()
            .await
            .map_err(Error::from)?;

        Self::read_json(response).await?;
        Ok(())
    }

    async fn list_inboxes(&self) -> airparser_core::Result<Vec<Inbox>> {
        let url = self.endpoint(["inboxes"])?;

        let response = self.http().get(url).send().await.map_err(Error::from)?;
        let value = Self::read_json(response).await?;
        let inboxes: Vec<Inbox> = serde_json::from_value(value).map_err(Error::from)?;

        tracing::debug!(
            target: TRACING_TARGET,
            count = inboxes.len(),
            "Listed inboxes"
        );

        Ok(inboxes)
    }

    async fn verify_credentials(&self) -> airparser_core::Result<serde_json::Value> {
        let url = self.endpoint(CREDENTIAL_TEST_PATH.split('/').filter(|s| !s.is_empty()))?;

        let response = self.http().get(url).send().await.map_err(Error::from)?;
        let account = Self::read_json(response).await?;

        tracing::debug!(target: TRACING_TARGET, "Credentials verified");

        Ok(account)
    }
}
