//! Conversation and message types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable conversation identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(pub u64);

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Message identifier, unique within one conversation's log
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub String);

impl MessageId {
    /// Mint a fresh collision-resistant id
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MessageId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A single chat message
///
/// Ownership is derived from the author at construction and cannot be set
/// independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub id: MessageId,
    pub author: String,
    pub body: String,
    pub timestamp: DateTime<Utc>,
    is_own: bool,
}

impl Message {
    pub fn new(
        id: MessageId,
        author: impl Into<String>,
        body: impl Into<String>,
        timestamp: DateTime<Utc>,
        local_user: &str,
    ) -> Self {
        let author = author.into();
        let is_own = author == local_user;
        Self {
            id,
            author,
            body: body.into(),
            timestamp,
            is_own,
        }
    }

    /// Whether the local user wrote this message
    pub fn is_own(&self) -> bool {
        self.is_own
    }
}

/// Summary row of the conversation directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub peer_name: String,
    /// Body of the most recent message
    pub preview: String,
    /// Display string derived from `last_activity`
    pub activity_label: String,
    pub last_activity: DateTime<Utc>,
    pub unread: u32,
}

/// A chat message entering the engine, from a peer or an acknowledged send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEvent {
    pub conversation_id: ConversationId,
    pub author: String,
    pub body: String,
    pub timestamp: DateTime<Utc>,
    /// Id assigned by the transport, if any
    pub message_id: Option<MessageId>,
}

impl ChatEvent {
    pub fn new(
        conversation_id: ConversationId,
        author: impl Into<String>,
        body: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            conversation_id,
            author: author.into(),
            body: body.into(),
            timestamp,
            message_id: None,
        }
    }

    /// Event for a message the transport already materialised
    pub fn from_message(conversation_id: ConversationId, message: &Message) -> Self {
        Self {
            conversation_id,
            author: message.author.clone(),
            body: message.body.clone(),
            timestamp: message.timestamp,
            message_id: Some(message.id.clone()),
        }
    }
}
