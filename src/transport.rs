//! Transport abstraction
//!
//! The session never talks to a backend directly; history loads and sends go
//! through this trait so the runtime can be driven by mocks in tests.

mod error;
mod memory;

pub use error::{TransportError, TransportErrorKind};
pub use memory::InMemoryTransport;

use crate::model::{ConversationId, Message};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait Transport: Send + Sync {
    /// Full log of a conversation in arrival order; empty if it has none
    async fn fetch_messages(
        &self,
        conversation_id: ConversationId,
    ) -> Result<Vec<Message>, TransportError>;

    /// Deliver composed text; returns the message as the backend stored it
    async fn send_message(
        &self,
        conversation_id: ConversationId,
        text: &str,
    ) -> Result<Message, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn fetch_messages(
        &self,
        conversation_id: ConversationId,
    ) -> Result<Vec<Message>, TransportError> {
        (**self).fetch_messages(conversation_id).await
    }

    async fn send_message(
        &self,
        conversation_id: ConversationId,
        text: &str,
    ) -> Result<Message, TransportError> {
        (**self).send_message(conversation_id, text).await
    }
}
