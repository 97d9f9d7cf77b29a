//! Render-facing view model
//!
//! Everything the two panes need to draw, already formatted. Events are
//! serialised with a `type` tag so a collaborator can forward them as JSON.

use crate::clock::TimeFormatter;
use crate::model::{Conversation, ConversationId, Message, MessageId};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One row of the conversation list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationView {
    pub id: ConversationId,
    pub peer_name: String,
    pub preview: String,
    pub time: String,
    pub unread: u32,
    pub focused: bool,
}

impl ConversationView {
    pub fn new(conversation: &Conversation, focused: Option<ConversationId>) -> Self {
        Self {
            id: conversation.id,
            peer_name: conversation.peer_name.clone(),
            preview: conversation.preview.clone(),
            time: conversation.activity_label.clone(),
            unread: conversation.unread,
            focused: focused == Some(conversation.id),
        }
    }
}

/// One bubble of the message pane
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageView {
    pub id: MessageId,
    pub author: String,
    pub body: String,
    pub timestamp: DateTime<Utc>,
    pub time: String,
    pub is_own: bool,
}

impl MessageView {
    pub fn new(message: &Message, formatter: &TimeFormatter) -> Self {
        Self {
            id: message.id.clone(),
            author: message.author.clone(),
            body: message.body.clone(),
            timestamp: message.timestamp,
            time: formatter.format(message.timestamp),
            is_own: message.is_own(),
        }
    }
}

/// Full picture of the session, used for the first paint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub local_user: String,
    pub conversations: Vec<ConversationView>,
    pub focused: Option<ConversationId>,
    pub loading: bool,
    pub messages: Vec<MessageView>,
    pub draft: String,
    pub total_unread: u32,
}

/// Incremental updates for the render collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RenderEvent {
    /// Conversation list changed (order, preview or unread)
    Directory {
        conversations: Vec<ConversationView>,
        total_unread: u32,
    },
    /// Focus moved; `None` means the empty "pick a conversation" pane
    Focus {
        focused: Option<ConversationId>,
        loading: bool,
    },
    /// Visible list replaced by a completed history load
    History {
        conversation_id: ConversationId,
        messages: Vec<MessageView>,
    },
    /// A live message was appended to the visible list
    Appended {
        conversation_id: ConversationId,
        message: MessageView,
    },
    /// History load failed; the pane stays empty
    HistoryFailed {
        conversation_id: ConversationId,
        error: String,
    },
    /// Send failed; the draft is still there for a manual retry
    SendFailed {
        conversation_id: ConversationId,
        draft: String,
        error: String,
    },
    /// The draft was cleared after a successful send
    DraftCleared,
}

impl RenderEvent {
    pub fn type_name(&self) -> &'static str {
        match self {
            RenderEvent::Directory { .. } => "directory",
            RenderEvent::Focus { .. } => "focus",
            RenderEvent::History { .. } => "history",
            RenderEvent::Appended { .. } => "appended",
            RenderEvent::HistoryFailed { .. } => "history_failed",
            RenderEvent::SendFailed { .. } => "send_failed",
            RenderEvent::DraftCleared => "draft_cleared",
        }
    }
}
