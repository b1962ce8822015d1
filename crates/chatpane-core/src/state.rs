//! UI-agnostic message types
//!
//! This module contains data structures that are shared between the
//! transcript view and whatever host owns the conversation. Nothing here
//! depends on a specific UI framework.

use serde::{Deserialize, Serialize};

/// A chat message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Self::new(Role::Ai, content)
    }
}

/// The role of a chat message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "ai", alias = "assistant")]
    Ai,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Ai => "ai",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "user" => Some(Role::User),
            "ai" | "assistant" => Some(Role::Ai),
            _ => None,
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Role::User)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_names() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Role::Ai).unwrap(), "\"ai\"");
    }

    #[test]
    fn test_role_accepts_assistant_alias() {
        let role: Role = serde_json::from_str("\"assistant\"").unwrap();
        assert_eq!(role, Role::Ai);
        assert_eq!(Role::from_str("Assistant"), Some(Role::Ai));
    }

    #[test]
    fn test_role_from_str_rejects_unknown() {
        assert_eq!(Role::from_str("system"), None);
        assert_eq!(Role::from_str("USER"), Some(Role::User));
    }

    #[test]
    fn test_message_json_shape() {
        let msg = ChatMessage::ai("Hello $x^2$");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json, serde_json::json!({"role": "ai", "content": "Hello $x^2$"}));
    }

    #[test]
    fn test_only_user_is_user() {
        assert!(ChatMessage::user("hi").role.is_user());
        assert!(!ChatMessage::ai("hi").role.is_user());
    }
}
