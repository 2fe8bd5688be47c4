//! SOC chat message and session types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Title given to a session before its first user message.
pub const UNTITLED_SESSION: &str = "New session";

/// Longest title, in characters, derived from a first message.
const TITLE_MAX_CHARS: usize = 40;

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// A single turn in a chat session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// An ordered conversation with the SOC assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: String,
    pub title: String,
    pub messages: Vec<ChatMessage>,
    pub last_update: DateTime<Utc>,
}

impl ChatSession {
    /// Start an empty, untitled session.
    pub fn new() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: UNTITLED_SESSION.to_string(),
            messages: Vec::new(),
            last_update: Utc::now(),
        }
    }

    /// Append a message and bump `last_update`.
    ///
    /// The first user message names the session.
    pub fn push(&mut self, message: ChatMessage) {
        if message.role == ChatRole::User
            && !self.messages.iter().any(|m| m.role == ChatRole::User)
        {
            self.title = title_from(&message.text);
        }
        self.last_update = message.timestamp;
        self.messages.push(message);
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

fn title_from(text: &str) -> String {
    let line = text.lines().next().unwrap_or_default().trim();
    if line.is_empty() {
        return UNTITLED_SESSION.to_string();
    }
    if line.chars().count() <= TITLE_MAX_CHARS {
        return line.to_string();
    }
    let mut title: String = line.chars().take(TITLE_MAX_CHARS).collect();
    title.push('…');
    title
}
