//! Core types for the conversation thread.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Opening assistant message installed at session start and after every reset.
pub const GREETING: &str = "Hello! I'm your AI Health & Mental Wellbeing Agent. I can help you with fitness planning, nutrition advice, mental wellness support, and health assessments. How can I assist you today?";

/// Assistant message appended in place of a reply when the backend cannot be reached.
pub const FALLBACK_REPLY: &str = "I'm sorry, I'm having trouble connecting right now. Please make sure the backend server is running and try again.";

static NEXT_MESSAGE_ID: AtomicU64 = AtomicU64::new(1);

/// Identifier of a message, ordered by creation within the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(u64);

impl MessageId {
    /// Allocate the next identifier
    pub fn next() -> Self {
        Self(NEXT_MESSAGE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "msg-{:06}", self.0)
    }
}

/// Which party authored a message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    User,
    Assistant,
}

impl Origin {
    /// Label used when rendering the thread
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::User => "You",
            Self::Assistant => "Assistant",
        }
    }
}

/// A single chat message. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Creation-ordered message ID
    pub id: MessageId,
    /// Who wrote the message
    pub origin: Origin,
    /// Message content, never empty
    pub text: String,
    /// When the message was created
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a new user message
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Origin::User, text)
    }

    /// Create a new assistant message
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Origin::Assistant, text)
    }

    /// Create the canonical greeting with a fresh timestamp
    pub fn greeting() -> Self {
        Self::assistant(GREETING)
    }

    /// Create the fixed connectivity fallback
    pub fn fallback() -> Self {
        Self::assistant(FALLBACK_REPLY)
    }

    fn new(origin: Origin, text: impl Into<String>) -> Self {
        Self {
            id: MessageId::next(),
            origin,
            text: text.into(),
            created_at: Utc::now(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.origin == Origin::User
    }

    /// Local wall-clock time as `HH:MM`
    pub fn display_time(&self) -> String {
        self.created_at.with_timezone(&Local).format("%H:%M").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_creation() {
        let msg = Message::user("Hello");
        assert_eq!(msg.origin, Origin::User);
        assert_eq!(msg.text, "Hello");
        assert!(msg.is_user());

        let msg = Message::assistant("Hi there!");
        assert_eq!(msg.origin, Origin::Assistant);
        assert!(!msg.is_user());
    }

    #[test]
    fn test_ids_follow_creation_order() {
        let first = Message::user("one");
        let second = Message::assistant("two");
        let third = Message::greeting();
        assert!(first.id < second.id);
        assert!(second.id < third.id);
    }

    #[test]
    fn test_greeting_and_fallback_text() {
        assert_eq!(Message::greeting().text, GREETING);
        assert_eq!(Message::fallback().text, FALLBACK_REPLY);
        assert_eq!(Message::fallback().origin, Origin::Assistant);
    }

    #[test]
    fn test_display_time_format() {
        let time = Message::user("x").display_time();
        assert_eq!(time.len(), 5);
        assert_eq!(&time[2..3], ":");
    }

    #[test]
    fn test_serialized_shape() {
        let msg = Message::assistant("line one\nline two");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["origin"], "assistant");
        assert_eq!(json["text"], "line one\nline two");
        assert!(json["id"].is_u64());
        assert!(json.get("createdAt").is_some());
    }
}
