//! Session state owned by the engine

use crate::clock::{Clock, TimeFormatter};
use crate::config::{SessionConfig, UnknownConversationPolicy};
use crate::directory::Directory;
use crate::error::{ChatError, ChatResult};
use crate::focus::FocusController;
use crate::model::{ChatEvent, Conversation, ConversationId, Message, MessageId};
use crate::render::{ConversationView, MessageView, RenderEvent, SessionSnapshot};
use crate::seed;
use crate::store::MessageStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Message store, conversation directory, focus and draft of one session.
///
/// Only the engine mutates this; store and directory are always updated
/// together.
#[derive(Debug, Clone)]
pub struct ChatState {
    local_user: String,
    policy: UnknownConversationPolicy,
    store: MessageStore,
    directory: Directory,
    focus: FocusController,
    draft: String,
}

impl ChatState {
    /// Build a session, seeded when the config asks for it
    pub fn new(config: &SessionConfig, clock: Arc<dyn Clock>) -> Self {
        let formatter = TimeFormatter::new(config.locale, config.utc_offset, clock);
        let mut state = Self {
            local_user: config.local_user.clone(),
            policy: config.unknown_conversation,
            store: MessageStore::new(),
            directory: Directory::new(formatter),
            focus: FocusController::new(),
            draft: String::new(),
        };
        if config.seed {
            state.load_seed();
        }
        state
    }

    fn load_seed(&mut self) {
        for conv in seed::conversations() {
            self.add_conversation(
                conv.id,
                conv.peer_name,
                conv.preview,
                conv.last_activity,
                conv.unread,
            );
        }
        for (id, messages) in seed::logs(&self.local_user) {
            for message in messages {
                self.store.append(id, message);
            }
        }
    }

    /// Register a conversation, e.g. from a backend's conversation list
    pub fn add_conversation(
        &mut self,
        id: ConversationId,
        peer_name: impl Into<String>,
        preview: impl Into<String>,
        last_activity: DateTime<Utc>,
        unread: u32,
    ) {
        let activity_label = self.directory.formatter().format(last_activity);
        self.directory.insert(Conversation {
            id,
            peer_name: peer_name.into(),
            preview: preview.into(),
            activity_label,
            last_activity,
            unread,
        });
    }

    // ==================== Reconciliation ====================

    /// Record one chat message into store, visible list and directory.
    ///
    /// The target is resolved before anything is touched, so an unknown
    /// conversation leaves the state unchanged.
    pub fn record_event(&mut self, event: ChatEvent) -> ChatResult<Message> {
        let conversation_id = event.conversation_id;
        self.resolve_conversation(&event)?;

        let id = match event.message_id {
            Some(id) if !self.store.contains(conversation_id, &id) => id,
            Some(id) => {
                let fresh = MessageId::generate();
                tracing::warn!(
                    conversation_id = %conversation_id,
                    duplicate = %id,
                    replacement = %fresh,
                    "Message id already used in this conversation, minting a new one"
                );
                fresh
            }
            None => MessageId::generate(),
        };

        let message = Message::new(
            id,
            event.author,
            event.body,
            event.timestamp,
            &self.local_user,
        );

        self.store.append(conversation_id, message.clone());

        let focused = self.focus.is_focused(conversation_id);
        if focused {
            self.focus.push_visible(message.clone());
        }

        let suppress_unread = focused || message.is_own();
        self.directory.upsert_activity(
            conversation_id,
            &message.body,
            message.timestamp,
            suppress_unread,
        )?;

        tracing::debug!(
            conversation_id = %conversation_id,
            message_id = %message.id,
            own = message.is_own(),
            focused,
            "Recorded message"
        );
        Ok(message)
    }

    fn resolve_conversation(&mut self, event: &ChatEvent) -> ChatResult<()> {
        let id = event.conversation_id;
        if self.directory.contains(id) {
            return Ok(());
        }
        match self.policy {
            UnknownConversationPolicy::Reject => Err(ChatError::UnknownConversation(id)),
            UnknownConversationPolicy::Create => {
                let peer_name = if self.is_local(&event.author) {
                    format!("#{id}")
                } else {
                    event.author.clone()
                };
                tracing::info!(conversation_id = %id, peer = %peer_name, "Creating conversation");
                self.add_conversation(id, peer_name, "", event.timestamp, 0);
                Ok(())
            }
        }
    }

    /// Open a conversation and clear its unread count
    pub fn select(&mut self, id: ConversationId) -> ChatResult<u64> {
        if !self.directory.contains(id) {
            return Err(ChatError::UnknownConversation(id));
        }
        self.directory.clear_unread(id)?;
        Ok(self.focus.focus(id))
    }

    pub fn back(&mut self) {
        self.focus.unfocus();
    }

    pub fn apply_history(
        &mut self,
        id: ConversationId,
        generation: u64,
        messages: Vec<Message>,
    ) -> bool {
        // Ownership is relative to this session's user
        let messages = messages
            .into_iter()
            .map(|m| Message::new(m.id, m.author, m.body, m.timestamp, &self.local_user))
            .collect();
        self.focus.replace_visible(id, generation, messages)
    }

    pub fn fail_history(&mut self, id: ConversationId, generation: u64) -> bool {
        self.focus.finish_loading(id, generation)
    }

    // ==================== Draft ====================

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Target and text of the next send, if sending is allowed right now
    pub fn submission(&self) -> ChatResult<(ConversationId, String)> {
        let conversation_id = self.focus.focused().ok_or(ChatError::NothingFocused)?;
        if self.draft.trim().is_empty() {
            return Err(ChatError::EmptyDraft);
        }
        Ok((conversation_id, self.draft.clone()))
    }

    /// Clear the draft unless it was edited since `sent` was submitted
    pub fn clear_draft_if(&mut self, sent: &str) -> bool {
        if self.draft == sent {
            self.draft.clear();
            true
        } else {
            false
        }
    }

    // ==================== Accessors ====================

    pub fn local_user(&self) -> &str {
        &self.local_user
    }

    pub fn is_local(&self, author: &str) -> bool {
        author == self.local_user
    }

    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn focus(&self) -> &FocusController {
        &self.focus
    }

    /// Refresh time labels, e.g. after the date rolled over
    pub fn relabel(&mut self) {
        self.directory.relabel();
    }

    // ==================== Views ====================

    pub fn conversation_views(&self) -> Vec<ConversationView> {
        let focused = self.focus.focused();
        self.directory
            .entries()
            .iter()
            .map(|c| ConversationView::new(c, focused))
            .collect()
    }

    pub fn message_view(&self, message: &Message) -> MessageView {
        MessageView::new(message, self.directory.formatter())
    }

    pub fn directory_event(&self) -> RenderEvent {
        RenderEvent::Directory {
            conversations: self.conversation_views(),
            total_unread: self.directory.total_unread(),
        }
    }

    pub fn focus_event(&self) -> RenderEvent {
        RenderEvent::Focus {
            focused: self.focus.focused(),
            loading: self.focus.is_loading(),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            local_user: self.local_user.clone(),
            conversations: self.conversation_views(),
            focused: self.focus.focused(),
            loading: self.focus.is_loading(),
            messages: self
                .focus
                .visible()
                .iter()
                .map(|m| self.message_view(m))
                .collect(),
            draft: self.draft.clone(),
            total_unread: self.directory.total_unread(),
        }
    }
}
