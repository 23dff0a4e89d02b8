//! Wire types of the subscribe and unsubscribe endpoints.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use url::Url;

use super::TriggerEvent;

/// Body of `POST /n8n/subscribe`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct SubscribeRequest {
    /// URL Airparser will POST events to.
    #[cfg_attr(feature = "schema", schemars(with = "String"))]
    pub hook_url: Url,
    /// Inbox whose events are delivered.
    pub inbox_id: String,
    /// Subscribed event.
    pub event: TriggerEvent,
}

/// Response of `POST /n8n/subscribe`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct Subscription {
    /// Id of the created hook; absent if the service did not return one.
    ///
    /// Any truthy `_id` counts. Non-string ids are kept in their JSON form.
    #[serde(
        rename = "_id",
        default,
        deserialize_with = "hook_id",
        skip_serializing_if = "Option::is_none"
    )]
    #[cfg_attr(feature = "schema", schemars(with = "Option<String>"))]
    pub id: Option<String>,
}

fn hook_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let id = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null | Value::Bool(false)) => None,
        Some(Value::String(id)) if id.is_empty() => None,
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => None,
        Some(Value::String(id)) => Some(id),
        Some(other) => Some(other.to_string()),
    };
    Ok(id)
}

/// Body of `DELETE /n8n/unsubscribe`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct UnsubscribeRequest {
    /// Id of the hook to remove.
    pub hook_id: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn subscribe_request_shape() {
        let request = SubscribeRequest {
            hook_url: Url::parse("https://example.com/webhook").unwrap(),
            inbox_id: "inbox-1".to_owned(),
            event: TriggerEvent::DocParsed,
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "hook_url": "https://example.com/webhook",
                "inbox_id": "inbox-1",
                "event": "doc.parsed",
            })
        );
    }

    #[test]
    fn subscription_tolerates_missing_id() {
        let with_id: Subscription = serde_json::from_value(json!({"_id": "h1"})).unwrap();
        assert_eq!(with_id.id.as_deref(), Some("h1"));

        let without: Subscription = serde_json::from_value(json!({})).unwrap();
        assert!(without.id.is_none());
    }

    #[test]
    fn subscription_keeps_non_string_ids() {
        let numeric: Subscription = serde_json::from_value(json!({"_id": 123})).unwrap();
        assert_eq!(numeric.id.as_deref(), Some("123"));

        let falsy = [json!({"_id": ""}), json!({"_id": 0}), json!({"_id": false}), json!({"_id": null})];
        for body in falsy {
            let subscription: Subscription = serde_json::from_value(body.clone()).unwrap();
            assert!(subscription.id.is_none(), "{body}");
        }
    }
}
