//! In-process backend
//!
//! Stands in for a chat server: keeps its own copy of every conversation's
//! log, stamps sent messages with a fresh id and the clock's time, and lets
//! callers inject peer traffic.

use super::{Transport, TransportError};
use crate::clock::Clock;
use crate::model::{ConversationId, Message, MessageId};
use crate::seed;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub struct InMemoryTransport {
    local_user: String,
    clock: Arc<dyn Clock>,
    logs: Mutex<HashMap<ConversationId, Vec<Message>>>,
}

impl InMemoryTransport {
    pub fn new(local_user: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            local_user: local_user.into(),
            clock,
            logs: Mutex::new(HashMap::new()),
        }
    }

    /// Backend pre-populated with the built-in seed history
    pub fn seeded(local_user: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        let transport = Self::new(local_user, clock);
        {
            let mut logs = transport.lock();
            for (id, messages) in seed::logs(&transport.local_user) {
                logs.insert(id, messages);
            }
        }
        transport
    }

    /// Record a message written by a peer and return it for delivery to the session
    pub fn deliver_from_peer(
        &self,
        conversation_id: ConversationId,
        author: &str,
        body: &str,
    ) -> Message {
        let message = Message::new(
            MessageId::generate(),
            author,
            body,
            self.clock.now(),
            &self.local_user,
        );
        self.lock()
            .entry(conversation_id)
            .or_default()
            .push(message.clone());
        tracing::debug!(conversation_id = %conversation_id, author, "Peer message delivered");
        message
    }

    /// Number of messages the backend holds for a conversation
    pub fn message_count(&self, conversation_id: ConversationId) -> usize {
        self.lock().get(&conversation_id).map_or(0, Vec::len)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<ConversationId, Vec<Message>>> {
        self.logs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl Transport for InMemoryTransport {
    async fn fetch_messages(
        &self,
        conversation_id: ConversationId,
    ) -> Result<Vec<Message>, TransportError> {
        Ok(self
            .lock()
            .get(&conversation_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn send_message(
        &self,
        conversation_id: ConversationId,
        text: &str,
    ) -> Result<Message, TransportError> {
        let message = Message::new(
            MessageId::generate(),
            self.local_user.as_str(),
            text,
            self.clock.now(),
            &self.local_user,
        );
        self.lock()
            .entry(conversation_id)
            .or_default()
            .push(message.clone());
        Ok(message)
    }
}
