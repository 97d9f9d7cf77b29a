//! Error types for the chat session

use crate::model::ConversationId;
use crate::transport::TransportError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    #[error("Unknown conversation: {0}")]
    UnknownConversation(ConversationId),
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("Nothing to send: draft is empty")]
    EmptyDraft,
    #[error("No conversation is open")]
    NothingFocused,
    #[error("Chat session is closed")]
    SessionClosed,
}

pub type ChatResult<T> = Result<T, ChatError>;
