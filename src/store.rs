//! Per-conversation message logs
//!
//! Arrival order is authoritative for log position; timestamps are not
//! consulted. Logs are append-only.

use crate::model::{ConversationId, Message, MessageId};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct MessageStore {
    logs: HashMap<ConversationId, Vec<Message>>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to the end of a conversation's log
    pub fn append(&mut self, conversation_id: ConversationId, message: Message) {
        self.logs.entry(conversation_id).or_default().push(message);
    }

    /// Full log in arrival order, empty if the conversation has no messages
    pub fn read(&self, conversation_id: ConversationId) -> &[Message] {
        self.logs
            .get(&conversation_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn contains(&self, conversation_id: ConversationId, id: &MessageId) -> bool {
        self.read(conversation_id).iter().any(|m| &m.id == id)
    }

    pub fn last(&self, conversation_id: ConversationId) -> Option<&Message> {
        self.read(conversation_id).last()
    }

    pub fn len(&self, conversation_id: ConversationId) -> usize {
        self.read(conversation_id).len()
    }

    /// Number of messages across all conversations
    pub fn total(&self) -> usize {
        self.logs.values().map(Vec::len).sum()
    }
}
