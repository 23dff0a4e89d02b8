//! Webhook subscription lifecycle and delivery handling for the trigger.
//!
//! - [`WebhookLifecycle`]: create, check and delete a subscription, keeping
//!   the hook id in an injected [`StaticDataStore`]
//! - [`DeliveryHandler`]: verifies inbound deliveries and turns them into
//!   [`WorkflowItem`]s

mod delivery;
mod event;
mod lifecycle;
mod store;
mod subscription;

pub use delivery::{DeliveryHandler, DeliveryOutcome, WEBHOOK_SECRET_HEADER, WorkflowItem};
pub use event::TriggerEvent;
pub use lifecycle::{WebhookLifecycle, WebhookRegistration};
pub use store::{FileStore, HOOK_ID_KEY, MemoryStore, StaticDataStore};
pub use subscription::{SubscribeRequest, Subscription, UnsubscribeRequest};

/// Tracing target for webhook operations.
pub const TRACING_TARGET: &str = "airparser_core::webhook";
