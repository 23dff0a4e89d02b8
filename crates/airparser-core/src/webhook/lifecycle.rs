//! Create, check and delete the webhook subscription of one trigger.

use url::Url;

use super::{HOOK_ID_KEY, StaticDataStore, SubscribeRequest, TRACING_TARGET, TriggerEvent};
use crate::inbox::InboxLocator;
use crate::{AirparserService, Error, Result};

/// Parameters that identify a trigger's subscription.
#[derive(Debug, Clone)]
pub struct WebhookRegistration {
    /// Inbox whose events are wanted.
    pub inbox: InboxLocator,
    /// Subscribed event; `doc.parsed` when unset.
    pub event: Option<TriggerEvent>,
    /// Public URL of this trigger's webhook endpoint.
    pub webhook_url: Option<Url>,
}

impl WebhookRegistration {
    /// Creates a registration for the default event.
    pub fn new(inbox: impl Into<InboxLocator>, webhook_url: Url) -> Self {
        Self {
            inbox: inbox.into(),
            event: None,
            webhook_url: Some(webhook_url),
        }
    }

    /// Sets the subscribed event.
    #[must_use]
    pub fn with_event(mut self, event: TriggerEvent) -> Self {
        self.event = Some(event);
        self
    }
}

/// Manages one trigger's subscription against an injected [`StaticDataStore`].
///
/// Existence is a local lookup of the stored hook id; it is never checked
/// against the service. Registration failures are reported as `false`, and
/// deletion always succeeds.
#[derive(Debug)]
pub struct WebhookLifecycle<S> {
    service: AirparserService,
    store: S,
    registration: WebhookRegistration,
}

impl<S: StaticDataStore> WebhookLifecycle<S> {
    /// Creates a lifecycle manager.
    pub fn new(service: AirparserService, store: S, registration: WebhookRegistration) -> Self {
        Self {
            service,
            store,
            registration,
        }
    }

    /// Returns the registration parameters.
    pub fn registration(&self) -> &WebhookRegistration {
        &self.registration
    }

    /// Returns `true` if a hook id is stored for this trigger.
    pub async fn check_exists(&self) -> Result<bool> {
        let exists = self.store.get(HOOK_ID_KEY).await?.is_some();

        tracing::debug!(
            target: TRACING_TARGET,
            exists,
            "Checked stored webhook subscription"
        );

        Ok(exists)
    }

    /// Subscribes the webhook URL and stores the returned hook id.
    ///
    /// Returns `Ok(false)` when the service rejects the subscription.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` when no webhook URL is set, `InvalidInput`
    /// when no inbox is selected, and propagates store failures.
    pub async fn create(&self) -> Result<bool> {
        let Some(hook_url) = self.registration.webhook_url.clone() else {
            return Err(Error::configuration().with_message("Webhook URL is not available"));
        };

        let request = SubscribeRequest {
            hook_url,
            inbox_id: self.registration.inbox.require_id()?.to_owned(),
            event: self.registration.event.unwrap_or_default(),
        };

        let subscription = match self.service.subscribe(&request).await {
            Ok(subscription) => subscription,
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    inbox_id = %request.inbox_id,
                    event = %request.event,
                    error = %error,
                    "Webhook registration failed"
                );
                return Ok(false);
            }
        };

        match subscription.id {
            Some(hook_id) => {
                self.store.set(HOOK_ID_KEY, &hook_id).await?;
                tracing::info!(
                    target: TRACING_TARGET,
                    hook_id = %hook_id,
                    inbox_id = %request.inbox_id,
                    event = %request.event,
                    "Webhook registered"
                );
            }
            None => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    inbox_id = %request.inbox_id,
                    "Webhook registered without a hook id"
                );
            }
        }

        Ok(true)
    }

    /// Unsubscribes the stored hook id and clears it.
    ///
    /// Always returns `Ok(true)` unless the store itself fails: a missing
    /// id or a failed unsubscribe both count as already deleted.
    pub async fn delete(&self) -> Result<bool> {
        let Some(hook_id) = self.store.get(HOOK_ID_KEY).await? else {
            return Ok(true);
        };

        match self.service.unsubscribe(&hook_id).await {
            Ok(()) => {
                tracing::info!(
                    target: TRACING_TARGET,
                    hook_id = %hook_id,
                    "Webhook unregistered"
                );
            }
            Err(error) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    hook_id = %hook_id,
                    error = %error,
                    "Unsubscribe failed, treating webhook as deleted"
                );
            }
        }

        self.store.remove(HOOK_ID_KEY).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockProvider;
    use crate::webhook::MemoryStore;

    fn registration() -> WebhookRegistration {
        WebhookRegistration::new("inbox-1", Url::parse("https://host.test/webhook").unwrap())
    }

    #[tokio::test]
    async fn create_stores_hook_id() {
        let provider = MockProvider::new().with_hook_id("hook-1");
        let store = MemoryStore::new();
        let lifecycle =
            WebhookLifecycle::new(AirparserService::new(provider.clone()), store.clone(), registration());

        assert!(!lifecycle.check_exists().await.unwrap());
        assert!(lifecycle.create().await.unwrap());
        assert!(lifecycle.check_exists().await.unwrap());
        assert_eq!(store.get(HOOK_ID_KEY).await.unwrap().as_deref(), Some("hook-1"));

        let subscribed = provider.subscriptions();
        assert_eq!(subscribed.len(), 1);
        assert_eq!(subscribed[0].inbox_id, "inbox-1");
        assert_eq!(subscribed[0].event, TriggerEvent::DocParsed);
        assert_eq!(subscribed[0].hook_url.as_str(), "https://host.test/webhook");
    }

    #[tokio::test]
    async fn create_failure_returns_false() {
        let provider = MockProvider::new().failing();
        let store = MemoryStore::new();
        let lifecycle = WebhookLifecycle::new(AirparserService::new(provider), store, registration());

        assert!(!lifecycle.create().await.unwrap());
        assert!(!lifecycle.check_exists().await.unwrap());
    }

    #[tokio::test]
    async fn create_without_url_is_an_error() {
        let mut registration = registration();
        registration.webhook_url = None;
        let lifecycle =
            WebhookLifecycle::new(AirparserService::new(MockProvider::new()), MemoryStore::new(), registration);

        let error = lifecycle.create().await.unwrap_err();
        assert_eq!(error.kind, crate::ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn create_without_returned_id_still_succeeds() {
        let lifecycle = WebhookLifecycle::new(
            AirparserService::new(MockProvider::new()),
            MemoryStore::new(),
            registration(),
        );

        assert!(lifecycle.create().await.unwrap());
        assert!(!lifecycle.check_exists().await.unwrap());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let provider = MockProvider::new().with_hook_id("hook-9");
        let store = MemoryStore::new();
        let lifecycle =
            WebhookLifecycle::new(AirparserService::new(provider.clone()), store.clone(), registration());

        assert!(lifecycle.delete().await.unwrap());
        assert!(provider.unsubscriptions().is_empty());

        lifecycle.create().await.unwrap();
        assert!(lifecycle.delete().await.unwrap());
        assert_eq!(provider.unsubscriptions(), vec!["hook-9".to_owned()]);
        assert!(!lifecycle.check_exists().await.unwrap());
    }

    #[tokio::test]
    async fn delete_swallows_unsubscribe_failure() {
        let provider = MockProvider::new().failing();
        let store = MemoryStore::new();
        store.set(HOOK_ID_KEY, "stale").await.unwrap();

        let lifecycle = WebhookLifecycle::new(AirparserService::new(provider), store.clone(), registration());
        assert!(lifecycle.delete().await.unwrap());
        assert!(store.get(HOOK_ID_KEY).await.unwrap().is_none());
    }
}
