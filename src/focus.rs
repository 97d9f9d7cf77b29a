//! Focus controller: the open conversation and its visible message list

use crate::model::{ConversationId, Message};

/// Tracks which conversation is open.
///
/// Every focus change bumps `generation`, so a history load that resolves
/// after the user moved on can be recognised and discarded.
#[derive(Debug, Clone, Default)]
pub struct FocusController {
    focused: Option<ConversationId>,
    visible: Vec<Message>,
    loading: bool,
    generation: u64,
}

impl FocusController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a conversation; returns the generation its history load must carry
    pub fn focus(&mut self, id: ConversationId) -> u64 {
        self.generation += 1;
        self.focused = Some(id);
        self.visible.clear();
        self.loading = true;
        self.generation
    }

    pub fn unfocus(&mut self) {
        self.generation += 1;
        self.focused = None;
        self.visible.clear();
        self.loading = false;
    }

    pub fn is_focused(&self, id: ConversationId) -> bool {
        self.focused == Some(id)
    }

    pub fn focused(&self) -> Option<ConversationId> {
        self.focused
    }

    /// Replace the visible list wholesale if the load is still current
    pub fn replace_visible(
        &mut self,
        id: ConversationId,
        generation: u64,
        messages: Vec<Message>,
    ) -> bool {
        if !self.is_current(id, generation) {
            return false;
        }
        self.visible = messages;
        self.loading = false;
        true
    }

    /// Mark a failed load as finished; the visible list stays as is
    pub fn finish_loading(&mut self, id: ConversationId, generation: u64) -> bool {
        if !self.is_current(id, generation) {
            return false;
        }
        self.loading = false;
        true
    }

    pub fn push_visible(&mut self, message: Message) {
        self.visible.push(message);
    }

    pub fn visible(&self) -> &[Message] {
        &self.visible
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    fn is_current(&self, id: ConversationId, generation: u64) -> bool {
        self.focused == Some(id) && self.generation == generation
    }
}
