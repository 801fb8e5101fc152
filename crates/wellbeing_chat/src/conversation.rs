//! Ordered conversation log.
//!
//! The log is append-only between resets and is never empty: it is created
//! with a seed message and `replace_all` swaps in a new seed in one step.

use crate::types::Message;

/// Ordered sequence of messages shown to the user
#[derive(Debug, Clone)]
pub struct ConversationLog {
    messages: Vec<Message>,
}

impl ConversationLog {
    /// Create a log holding a single seed message
    pub fn new(seed: Message) -> Self {
        Self {
            messages: vec![seed],
        }
    }

    /// Create a log seeded with the canonical greeting
    pub fn with_greeting() -> Self {
        Self::new(Message::greeting())
    }

    /// Add a message to the end of the log
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Discard every entry and install `seed` as the only message
    pub fn replace_all(&mut self, seed: Message) {
        self.messages = vec![seed];
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Never true: the log always holds its seed
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }
}
