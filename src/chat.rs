//! Assistant chat transcript.
//!
//! Append-only for the life of a session. Message ids are a per-transcript
//! sequence, so id order is creation order.

use serde::{Deserialize, Serialize};

pub const GREETING: &str = "Hi! How can I help you find a property today? You can say something like 'show me 2 bedroom houses in Los Angeles'.";
pub const APPLIED_REPLY: &str = "Sure! I've updated the search for you based on your request. Here's what I found.";
pub const FAILED_REPLY: &str =
    "I'm sorry, I had trouble understanding that. Could you please try rephrasing your request?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: u64,
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    next_id: u64,
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message and return its id.
    pub fn push(&mut self, role: ChatRole, content: impl Into<String>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(ChatMessage { id, role, content: content.into() });
        id
    }

    /// Seed the greeting when the chat opens on an empty transcript.
    pub fn greet_if_empty(&mut self) -> bool {
        if !self.messages.is_empty() {
            return false;
        }
        self.push(ChatRole::Assistant, GREETING);
        true
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
