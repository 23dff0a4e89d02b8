//! Inbox identifiers and list-search results.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// An inbox parameter as supplied by a workflow.
///
/// Accepts either a bare id string or a resource-locator object such as
/// `{"__rl": true, "mode": "list", "value": "<id>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InboxLocator {
    /// A plain inbox id.
    Id(String),
    /// A resource-locator object carrying the id in `value`.
    Locator {
        /// The selected inbox id.
        #[serde(default)]
        value: Option<String>,
        /// How the id was chosen (`list`, `id`, ...).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mode: Option<String>,
    },
}

impl InboxLocator {
    /// Returns the inbox id, which may be empty.
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Locator { value, .. } => value.as_deref().unwrap_or_default(),
        }
    }

    /// Returns the inbox id, rejecting an empty one.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when no inbox id was selected.
    pub fn require_id(&self) -> Result<&str> {
        let id = self.id().trim();
        if id.is_empty() {
            return Err(Error::invalid_input().with_message("no inbox selected"));
        }
        Ok(id)
    }
}

impl From<&str> for InboxLocator {
    fn from(id: &str) -> Self {
        Self::Id(id.to_owned())
    }
}

impl From<String> for InboxLocator {
    fn from(id: String) -> Self {
        Self::Id(id)
    }
}

/// An inbox as returned by the list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct Inbox {
    /// Inbox id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
}
