//! Conversation types and state management

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-conversation identifier; later messages always compare greater
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId(u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    #[default]
    Text,
    ImageAnalysis,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub kind: MessageKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quick_replies: Option<Vec<String>>,
}

/// The message log of one chat view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    pub messages: Vec<Message>,
    next_id: u64,
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            messages: Vec::new(),
            next_id: 1,
        }
    }

    /// Open with an assistant greeting
    pub fn with_greeting(mut self, content: &str, quick_replies: Vec<String>) -> Self {
        self.push(
            Role::Assistant,
            content,
            MessageKind::Text,
            Some(quick_replies).filter(|r| !r.is_empty()),
        );
        self
    }

    pub fn add_user(&mut self, content: &str) -> MessageId {
        self.push(Role::User, content, MessageKind::Text, None)
    }

    pub fn add_assistant(&mut self, content: &str, quick_replies: Option<Vec<String>>) -> MessageId {
        self.push(Role::Assistant, content, MessageKind::Text, quick_replies)
    }

    pub fn add_analysis(&mut self, content: &str) -> MessageId {
        self.push(Role::Assistant, content, MessageKind::ImageAnalysis, None)
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn push(
        &mut self,
        role: Role,
        content: &str,
        kind: MessageKind,
        quick_replies: Option<Vec<String>>,
    ) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.messages.push(Message {
            id,
            role,
            content: content.to_string(),
            created_at: Utc::now(),
            kind,
            quick_replies,
        });
        id
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}
