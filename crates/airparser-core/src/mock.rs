//! In-process provider for tests.
//!
//! [`MockProvider`] records every call and answers with canned data. It is
//! available to this crate's tests and, with the `test-utils` feature, to
//! downstream crates.
//!
//! ```rust,ignore
//! use airparser_core::AirparserService;
//! use airparser_core::mock::MockProvider;
//!
//! let provider = MockProvider::new().with_hook_id("hook-1");
//! let service = AirparserService::new(provider.clone());
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::{Value, json};

use crate::inbox::Inbox;
use crate::upload::UploadRequest;
use crate::webhook::{SubscribeRequest, Subscription};
use crate::{AirparserProvider, Error, ErrorKind, Result};

#[derive(Debug, Default)]
struct MockState {
    uploads: Vec<UploadRequest>,
    subscriptions: Vec<SubscribeRequest>,
    unsubscriptions: Vec<String>,
}

/// Recording provider with configurable responses.
#[derive(Debug, Clone, Default)]
pub struct MockProvider {
    state: Arc<Mutex<MockState>>,
    hook_id: Option<String>,
    inboxes: Vec<Inbox>,
    failing: bool,
}

impl MockProvider {
    /// Creates a provider that succeeds without returning a hook id.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `hook_id` from every subscribe call.
    #[must_use]
    pub fn with_hook_id(mut self, hook_id: impl Into<String>) -> Self {
        self.hook_id = Some(hook_id.into());
        self
    }

    /// Returns these inboxes from the list endpoint.
    #[must_use]
    pub fn with_inboxes(mut self, inboxes: Vec<Inbox>) -> Self {
        self.inboxes = inboxes;
        self
    }

    /// Makes every call fail with an `ExternalError`.
    #[must_use]
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Upload requests received so far.
    pub fn uploads(&self) -> Vec<UploadRequest> {
        self.state().uploads.clone()
    }

    /// Subscribe requests received so far.
    pub fn subscriptions(&self) -> Vec<SubscribeRequest> {
        self.state().subscriptions.clone()
    }

    /// Hook ids passed to unsubscribe so far.
    pub fn unsubscriptions(&self) -> Vec<String> {
        self.state().unsubscriptions.clone()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check(&self) -> Result<()> {
        if self.failing {
            return Err(Error::new(ErrorKind::ExternalError).with_message("mock failure"));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl AirparserProvider for MockProvider {
    async fn upload(&self, request: &UploadRequest) -> Result<Value> {
        self.check()?;
        self.state().uploads.push(request.clone());
        Ok(json!({ "inbox_id": request.inbox_id, "status": "queued" }))
    }

    async fn subscribe(&self, request: &SubscribeRequest) -> Result<Subscription> {
        self.check()?;
        self.state().subscriptions.push(request.clone());
        Ok(Subscription {
            id: self.hook_id.clone(),
        })
    }

    async fn unsubscribe(&self, hook_id: &str) -> Result<()> {
        self.check()?;
        self.state().unsubscriptions.push(hook_id.to_owned());
        Ok(())
    }

    async fn list_inboxes(&self) -> Result<Vec<Inbox>> {
        self.check()?;
        Ok(self.inboxes.clone())
    }

    async fn verify_credentials(&self) -> Result<Value> {
        self.check()?;
        Ok(json!({ "email": "mock@airparser.test" }))
    }
}
