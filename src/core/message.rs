//! Chat message types and conversation file parsing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    #[serde(alias = "assistant")]
    Bot,
}

impl Role {
    /// Class of the message element (`user-message` / `bot-message`).
    pub fn message_class(self) -> &'static str {
        match self {
            Role::User => "user-message",
            Role::Bot => "bot-message",
        }
    }

    /// Name shown in exports.
    pub fn display_name(self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Bot => "AI",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::User => "user",
            Role::Bot => "bot",
        })
    }
}

impl FromStr for Role {
    type Err = ConversationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "bot" | "assistant" => Ok(Role::Bot),
            other => Err(ConversationError::UnknownRole(other.to_string())),
        }
    }
}

/// A message as it appears in an export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: String,
}

/// A message read from a conversation file, before rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationEntry {
    pub role: Role,
    pub content: String,
    pub timestamp: Option<String>,
}

/// Error reading a conversation file.
#[derive(Debug, thiserror::Error)]
pub enum ConversationError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Conversation must be a JSON array of messages")]
    NotAnArray,
    #[error("Unknown message role '{0}' (expected user, bot or assistant)")]
    UnknownRole(String),
}

/// Extract text content from an API message (user or assistant).
/// Handles both string content and array-of-blocks format.
pub fn extract_content(msg: &Value) -> Option<String> {
    let content = msg.get("content")?;
    if let Some(s) = content.as_str() {
        return Some(s.to_string());
    }
    if let Some(arr) = content.as_array() {
        for block in arr {
            if let Some(text) = block.get("text").and_then(|t| t.as_str()) {
                return Some(text.to_string());
            }
        }
    }
    None
}

/// Parse a conversation: a JSON array of `{role, content[, timestamp]}`.
/// Messages with other roles (system, tool) or without text content are skipped.
pub fn parse_conversation(json: &str) -> Result<Vec<ConversationEntry>, ConversationError> {
    let value: Value = serde_json::from_str(json)?;
    let messages = value.as_array().ok_or(ConversationError::NotAnArray)?;
    let mut entries = Vec::with_capacity(messages.len());
    for msg in messages {
        let role = match msg.get("role").and_then(|r| r.as_str()) {
            Some("system") | Some("tool") | None => continue,
            Some(r) => r.parse::<Role>()?,
        };
        let Some(content) = extract_content(msg) else {
            log::debug!("Skipping {} message without text content", role);
            continue;
        };
        let timestamp = msg
            .get("timestamp")
            .and_then(|t| t.as_str())
            .map(String::from);
        entries.push(ConversationEntry {
            role,
            content,
            timestamp,
        });
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_content_string_direct() {
        let msg = serde_json::json!({"role": "user", "content": "Hello world"});
        assert_eq!(extract_content(&msg), Some("Hello world".to_string()));
    }

    #[test]
    fn extract_content_array_of_blocks() {
        let msg = serde_json::json!({
            "role": "assistant",
            "content": [{"type": "text", "text": "Response text"}]
        });
        assert_eq!(extract_content(&msg), Some("Response text".to_string()));
    }

    #[test]
    fn extract_content_missing_content() {
        let msg = serde_json::json!({"role": "user"});
        assert_eq!(extract_content(&msg), None);
    }

    #[test]
    fn parse_conversation_maps_roles_and_timestamps() {
        let json = r#"[
            {"role": "system", "content": "be nice"},
            {"role": "user", "content": "hi", "timestamp": "09:00:00"},
            {"role": "assistant", "content": [{"type": "text", "text": "hello"}]},
            {"role": "bot", "content": "again"}
        ]"#;
        let entries = parse_conversation(json).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].role, Role::User);
        assert_eq!(entries[0].timestamp.as_deref(), Some("09:00:00"));
        assert_eq!(entries[1].role, Role::Bot);
        assert_eq!(entries[1].content, "hello");
        assert_eq!(entries[2].timestamp, None);
    }

    #[test]
    fn parse_conversation_rejects_non_array() {
        assert!(matches!(
            parse_conversation(r#"{"messages": []}"#),
            Err(ConversationError::NotAnArray)
        ));
    }

    #[test]
    fn parse_conversation_rejects_unknown_role() {
        let err = parse_conversation(r#"[{"role": "narrator", "content": "x"}]"#).unwrap_err();
        assert!(err.to_string().contains("narrator"));
    }

    #[test]
    fn role_serializes_lowercase_and_accepts_assistant() {
        assert_eq!(serde_json::to_string(&Role::Bot).unwrap(), "\"bot\"");
        let role: Role = serde_json::from_str("\"assistant\"").unwrap();
        assert_eq!(role, Role::Bot);
    }
}
