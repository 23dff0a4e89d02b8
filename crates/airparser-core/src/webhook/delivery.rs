//! Turning inbound webhook deliveries into workflow items.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::TRACING_TARGET;

/// Header Airparser uses to echo a configured webhook secret.
pub const WEBHOOK_SECRET_HEADER: &str = "x-webhook-secret";

/// One item handed to the workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowItem {
    /// The delivered JSON body.
    pub json: Value,
}

/// Result of handling a delivery.
#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryOutcome {
    /// The delivery is genuine; emit the items.
    Accepted(Vec<WorkflowItem>),
    /// The secret did not match; respond with the error and emit nothing.
    Rejected {
        /// Reason reported to the sender.
        error: &'static str,
    },
}

impl DeliveryOutcome {
    /// JSON body to send back to the caller of the webhook.
    pub fn response_body(&self) -> Value {
        match self {
            Self::Accepted(_) => json!({ "received": true }),
            Self::Rejected { error } => json!({ "error": error }),
        }
    }
}

/// Validates deliveries against an optional shared secret.
#[derive(Clone, Default)]
pub struct DeliveryHandler {
    secret: Option<String>,
}

impl std::fmt::Debug for DeliveryHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliveryHandler")
            .field("has_secret", &self.secret.is_some())
            .finish()
    }
}

impl DeliveryHandler {
    /// Creates a handler; an empty secret disables verification.
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
        }
    }

    /// Handles one delivery given the received secret header and JSON body.
    pub fn handle(&self, received_secret: Option<&str>, body: Value) -> DeliveryOutcome {
        if let Some(expected) = &self.secret
            && received_secret != Some(expected.as_str())
        {
            tracing::warn!(
                target: TRACING_TARGET,
                secret_present = received_secret.is_some(),
                "Rejected webhook delivery with invalid secret"
            );
            return DeliveryOutcome::Rejected {
                error: "Invalid webhook secret",
            };
        }

        tracing::debug!(target: TRACING_TARGET, "Accepted webhook delivery");
        DeliveryOutcome::Accepted(vec![WorkflowItem { json: body }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_without_secret() {
        let handler = DeliveryHandler::new(None);
        let body = json!({"doc_id": "d1", "event": "doc.parsed"});

        let outcome = handler.handle(None, body.clone());
        assert_eq!(outcome, DeliveryOutcome::Accepted(vec![WorkflowItem { json: body }]));
    }

    #[test]
    fn empty_secret_disables_check() {
        let handler = DeliveryHandler::new(Some(String::new()));
        assert!(matches!(
            handler.handle(None, json!({})),
            DeliveryOutcome::Accepted(_)
        ));
    }

    #[test]
    fn verifies_secret() {
        let handler = DeliveryHandler::new(Some("s3cret".to_owned()));

        assert!(matches!(
            handler.handle(Some("s3cret"), json!({})),
            DeliveryOutcome::Accepted(_)
        ));

        let rejected = handler.handle(Some("wrong"), json!({}));
        assert_eq!(
            rejected.response_body(),
            json!({"error": "Invalid webhook secret"})
        );
        assert!(matches!(
            handler.handle(None, json!({})),
            DeliveryOutcome::Rejected { .. }
        ));
    }

    #[test]
    fn debug_hides_secret() {
        let handler = DeliveryHandler::new(Some("s3cret".to_owned()));
        assert!(!format!("{handler:?}").contains("s3cret"));
    }
}
