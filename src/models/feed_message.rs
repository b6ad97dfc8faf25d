use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A single decoded message from the feed.
///
/// The feed's event schema is not modeled here; messages pass through to the
/// consumer exactly as received. Accessors expose the common envelope fields
/// without committing to a schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct FeedMessage(JsonValue);

impl FeedMessage {
    /// The envelope `type` field, if present
    pub fn message_type(&self) -> Option<&str> {
        self.0.get("type").and_then(JsonValue::as_str)
    }

    /// The envelope `product_id` field, if present
    pub fn product_id(&self) -> Option<&str> {
        self.0.get("product_id").and_then(JsonValue::as_str)
    }

    /// The envelope `sequence` field, if present
    pub fn sequence(&self) -> Option<i64> {
        self.0.get("sequence").and_then(JsonValue::as_i64)
    }

    /// Borrow the raw JSON value
    pub fn as_value(&self) -> &JsonValue {
        &self.0
    }

    /// Consume the message, returning the raw JSON value
    pub fn into_inner(self) -> JsonValue {
        self.0
    }
}

impl From<JsonValue> for FeedMessage {
    fn from(value: JsonValue) -> Self {
        Self(value)
    }
}
