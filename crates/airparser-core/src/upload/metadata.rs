//! Optional metadata attached to uploads.

use serde_json::{Map, Value};

use crate::multipart::FieldSet;
use crate::{Error, Result};

/// Name of the single field carrying metadata on the binary path.
pub const PAYLOAD_FIELD_NAME: &str = "payload";

/// A JSON object of caller metadata, echoed back in the parsed result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    entries: Map<String, Value>,
}

impl Metadata {
    /// Creates metadata from a JSON object.
    pub fn new(entries: Map<String, Value>) -> Self {
        Self { entries }
    }

    /// Accepts an optional JSON value; `null` or absent yields empty metadata.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the value is not a JSON object.
    pub fn from_value(value: Option<Value>) -> Result<Self> {
        match value {
            None | Some(Value::Null) => Ok(Self::default()),
            Some(Value::Object(entries)) => Ok(Self::new(entries)),
            Some(other) => Err(Error::invalid_input()
                .with_message("metadata must be a JSON object")
                .with_context(other.to_string())),
        }
    }

    /// Parses metadata from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` for malformed JSON and `InvalidInput` for
    /// JSON that is not an object.
    pub fn parse(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(Some(value))
    }

    /// Returns `true` when no entries are present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Binary path: one `payload` field holding the whole object as JSON.
    pub fn to_payload_field(&self) -> Option<FieldSet> {
        if self.is_empty() {
            return None;
        }

        let json = Value::Object(self.entries.clone()).to_string();
        Some(FieldSet::new().with_field(PAYLOAD_FIELD_NAME, json))
    }

    /// Text/HTML path: one field per entry, strings verbatim, other values as JSON.
    pub fn to_flat_fields(&self) -> Option<FieldSet> {
        if self.is_empty() {
            return None;
        }

        let fields = self
            .entries
            .iter()
            .map(|(key, value)| {
                let text = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (key.clone(), text)
            })
            .collect();

        Some(fields)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn rejects_non_objects() {
        assert!(Metadata::from_value(Some(json!([1, 2]))).is_err());
        assert!(Metadata::from_value(Some(json!("text"))).is_err());
        assert!(Metadata::parse("{not json").is_err());
        assert!(Metadata::from_value(Some(Value::Null)).unwrap().is_empty());
    }

    #[test]
    fn empty_metadata_adds_no_fields() {
        let metadata = Metadata::default();
        assert!(metadata.to_payload_field().is_none());
        assert!(metadata.to_flat_fields().is_none());
    }

    #[test]
    fn payload_field_holds_json_object() {
        let metadata = Metadata::parse(r#"{"orderId":"12345","count":2}"#).unwrap();
        let fields = metadata.to_payload_field().unwrap();

        assert_eq!(fields.len(), 1);
        let parsed: Value = serde_json::from_str(fields.get("payload").unwrap()).unwrap();
        assert_eq!(parsed, json!({"orderId": "12345", "count": 2}));
    }

    #[test]
    fn flat_fields_keep_order_and_stringify() {
        let metadata =
            Metadata::parse(r#"{"orderId":"12345","nested":{"a":1},"flag":true}"#).unwrap();
        let fields = metadata.to_flat_fields().unwrap();

        let collected: Vec<_> = fields.iter().collect();
        assert_eq!(
            collected,
            vec![
                ("orderId", "12345"),
                ("nested", r#"{"a":1}"#),
                ("flag", "true"),
            ]
        );
    }
}
