//! Chat message wire types.
//!
//! Messages travel as JSON text frames. The wire shape is camelCase with
//! the message kind under the `"type"` key and an RFC 3339 timestamp, e.g.
//!
//! ```json
//! {"id":"k3j9x2ab","userId":"user-9f2k1c","username":"Guest",
//!  "text":"hello","timestamp":"2024-06-01T12:00:00Z","type":"message"}
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Ordinary user message.
    Message,
    /// Server or client generated notice.
    System,
    /// A participant joined.
    Join,
    /// A participant left.
    Leave,
}

/// A single chat message.
///
/// Created locally when the user sends, or decoded from an inbound frame.
/// Never mutated after creation; visible ordering is append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Client-generated opaque id.
    pub id: String,
    /// Opaque id of the sending client.
    pub user_id: String,
    /// Display name of the sender.
    pub username: String,
    /// Message text.
    pub text: String,
    /// When the message was authored.
    pub timestamp: DateTime<Utc>,
    /// Message kind, `"type"` on the wire.
    #[serde(rename = "type")]
    pub kind: MessageKind,
}

impl ChatMessage {
    /// Decode a message from a JSON text frame.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Encode this message as a JSON text frame.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_shape_uses_camel_case_and_type_key() {
        let message = ChatMessage {
            id: "abc123".into(),
            user_id: "user-1".into(),
            username: "Guest".into(),
            text: "hello".into(),
            timestamp: DateTime::<Utc>::UNIX_EPOCH,
            kind: MessageKind::Message,
        };

        let json: serde_json::Value =
            serde_json::from_str(&message.to_json().unwrap()).unwrap();
        assert_eq!(json["userId"], "user-1");
        assert_eq!(json["type"], "message");
        assert_eq!(json["timestamp"], "1970-01-01T00:00:00Z");
    }

    #[test]
    fn inbound_frame_decodes() {
        let raw = r#"{"id":"x","userId":"system","username":"System",
            "text":"Connected to chat","timestamp":"2024-06-01T12:00:00Z","type":"system"}"#;

        let message = ChatMessage::from_json(raw).unwrap();
        assert_eq!(message.kind, MessageKind::System);
        assert_eq!(message.username, "System");
    }

    #[test]
    fn malformed_frame_is_an_error() {
        assert!(ChatMessage::from_json("not json").is_err());
        assert!(ChatMessage::from_json(r#"{"id":"x"}"#).is_err());
        assert!(ChatMessage::from_json(r#"{"id":1,"userId":"u"}"#).is_err());
    }
}
