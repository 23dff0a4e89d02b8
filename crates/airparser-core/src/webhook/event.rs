//! Trigger events emitted by Airparser.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// Events a trigger can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[derive(Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumIter, EnumString, IntoStaticStr)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub enum TriggerEvent {
    /// A document finished parsing.
    #[default]
    #[serde(rename = "doc.parsed")]
    #[strum(serialize = "doc.parsed")]
    DocParsed,
}

impl TriggerEvent {
    /// Human-readable name shown when choosing an event.
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::DocParsed => "Document processed",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn wire_name() {
        assert_eq!(TriggerEvent::DocParsed.as_ref(), "doc.parsed");
        assert_eq!(TriggerEvent::from_str("doc.parsed").unwrap(), TriggerEvent::DocParsed);
        assert_eq!(
            serde_json::to_string(&TriggerEvent::DocParsed).unwrap(),
            "\"doc.parsed\""
        );
    }

    #[test]
    fn default_is_doc_parsed() {
        assert_eq!(TriggerEvent::default(), TriggerEvent::DocParsed);
        assert_eq!(TriggerEvent::iter().count(), 1);
    }
}
