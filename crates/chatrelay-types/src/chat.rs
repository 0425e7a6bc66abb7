//! Chat session and message records.
//!
//! Sessions are keyed by a caller-supplied external id. Messages reference
//! their session by that external id, never by the surrogate key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;

/// Maximum length of an external session id (matches the `VARCHAR(64)` column
/// the relay has always stored ids in).
pub const MAX_SESSION_ID_LEN: usize = 64;

/// Who authored a stored message.
///
/// Serialized as `"user"` / `"assistant"` in JSON. The persisted column uses
/// the legacy `human` / `system` vocabulary; see [`MessageRole::as_stored`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    /// Value written to the `chat_messages.role` column.
    pub fn as_stored(&self) -> &'static str {
        match self {
            MessageRole::User => "human",
            MessageRole::Assistant => "system",
        }
    }

    /// Parse the `chat_messages.role` column.
    pub fn from_stored(s: &str) -> Result<Self, String> {
        match s {
            "human" => Ok(MessageRole::User),
            "system" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid stored message role: '{other}'")),
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// A conversation thread identified by an opaque, caller-defined string.
///
/// Sessions are created lazily and never deleted or mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    /// Surrogate key assigned by storage.
    pub id: i64,
    /// External identifier supplied by the caller. Unique.
    pub session_id: String,
    pub created_at: DateTime<Utc>,
}

/// One stored turn of a conversation.
///
/// Messages are append-only and ordered by `id` within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    /// External id of the owning session.
    pub session_id: String,
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_role_mapping() {
        assert_eq!(MessageRole::User.as_stored(), "human");
        assert_eq!(MessageRole::Assistant.as_stored(), "system");
        assert_eq!(MessageRole::from_stored("human").unwrap(), MessageRole::User);
        assert_eq!(
            MessageRole::from_stored("system").unwrap(),
            MessageRole::Assistant
        );
        assert!(MessageRole::from_stored("user").is_err());
    }

    #[test]
    fn test_message_role_display() {
        assert_eq!(MessageRole::User.to_string(), "user");
        assert_eq!(MessageRole::Assistant.to_string(), "assistant");
    }

    #[test]
    fn test_message_role_serde() {
        let json = serde_json::to_string(&MessageRole::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
        let parsed: MessageRole = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(parsed, MessageRole::User);
    }

    #[test]
    fn test_chat_message_serialize() {
        let msg = ChatMessage {
            id: 7,
            session_id: "abc123".to_string(),
            role: MessageRole::User,
            content: "hello".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"role\":\"user\""));
        assert!(json.contains("\"session_id\":\"abc123\""));
    }
}
