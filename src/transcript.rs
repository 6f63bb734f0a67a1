//! Transcript storage
//!
//! Append-only, insertion-ordered log of exchanged messages. Validation
//! belongs to the controller; the store accepts whatever it is given.

use crate::sanitize::escape_html;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{PoisonError, RwLock};

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn as_str(self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }

    fn avatar(self) -> &'static str {
        match self {
            Sender::User => "U",
            Sender::Bot => "AI",
        }
    }
}

/// A single transcript entry. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub sender: Sender,
    /// Raw text as submitted or generated; escape before rendering
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(sender: Sender, content: impl Into<String>) -> Self {
        Self {
            id: format!("msg_{}", uuid::Uuid::new_v4().simple()),
            sender,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    #[cfg(test)]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Sender::User, content)
    }

    #[cfg(test)]
    pub fn bot(content: impl Into<String>) -> Self {
        Self::new(Sender::Bot, content)
    }

    /// Render-ready projection with escaped content
    pub fn view(&self) -> MessageView {
        MessageView {
            id: self.id.clone(),
            sender: self.sender,
            role: "article",
            avatar: self.sender.avatar(),
            html: escape_html(&self.content),
            datetime: self.timestamp.to_rfc3339(),
            time_label: self
                .timestamp
                .with_timezone(&Local)
                .format("%H:%M")
                .to_string(),
        }
    }
}

/// What the presentation layer needs to draw one message bubble
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageView {
    pub id: String,
    pub sender: Sender,
    pub role: &'static str,
    pub avatar: &'static str,
    pub html: String,
    pub datetime: String,
    pub time_label: String,
}

/// Ordered message log for one widget session
#[derive(Debug, Default)]
pub struct TranscriptStore {
    messages: RwLock<Vec<Message>>,
}

impl TranscriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, message: Message) {
        self.messages
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message);
    }

    /// Snapshot of all messages in display order
    pub fn all(&self) -> Vec<Message> {
        self.messages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.messages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn clear(&self) {
        self.messages
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
