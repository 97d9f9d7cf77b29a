//! Conversation directory: summary rows kept sorted by recency

use crate::clock::TimeFormatter;
use crate::error::{ChatError, ChatResult};
use crate::model::{Conversation, ConversationId};
use chrono::{DateTime, Utc};

/// Conversation summaries, always sorted descending by `last_activity`
#[derive(Debug, Clone)]
pub struct Directory {
    entries: Vec<Conversation>,
    formatter: TimeFormatter,
}

impl Directory {
    pub fn new(formatter: TimeFormatter) -> Self {
        Self {
            entries: Vec::new(),
            formatter,
        }
    }

    /// Add a conversation. An existing entry with the same id is replaced.
    pub fn insert(&mut self, conversation: Conversation) {
        self.entries.retain(|c| c.id != conversation.id);
        self.entries.push(conversation);
        self.resort();
    }

    /// Record activity on a conversation and re-sort.
    ///
    /// Preview, label and timestamp are overwritten unconditionally. Unread is
    /// reset when `suppress_unread` is set, otherwise incremented.
    pub fn upsert_activity(
        &mut self,
        id: ConversationId,
        preview: &str,
        timestamp: DateTime<Utc>,
        suppress_unread: bool,
    ) -> ChatResult<&Conversation> {
        let label = self.formatter.format(timestamp);
        let entry = self
            .entries
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(ChatError::UnknownConversation(id))?;

        entry.preview = preview.to_string();
        entry.activity_label = label;
        entry.last_activity = timestamp;
        entry.unread = if suppress_unread {
            0
        } else {
            entry.unread.saturating_add(1)
        };

        self.resort();
        self.get(id).ok_or(ChatError::UnknownConversation(id))
    }

    /// Reset unread without touching preview, time or order
    pub fn clear_unread(&mut self, id: ConversationId) -> ChatResult<()> {
        let entry = self
            .entries
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(ChatError::UnknownConversation(id))?;
        entry.unread = 0;
        Ok(())
    }

    /// Recompute every display label against the formatter's clock
    pub fn relabel(&mut self) {
        let now = self.formatter.now();
        for entry in &mut self.entries {
            entry.activity_label = self.formatter.format_at(entry.last_activity, now);
        }
    }

    pub fn get(&self, id: ConversationId) -> Option<&Conversation> {
        self.entries.iter().find(|c| c.id == id)
    }

    pub fn contains(&self, id: ConversationId) -> bool {
        self.get(id).is_some()
    }

    /// Index in recency order (0 is most recent)
    pub fn position(&self, id: ConversationId) -> Option<usize> {
        self.entries.iter().position(|c| c.id == id)
    }

    pub fn entries(&self) -> &[Conversation] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_unread(&self) -> u32 {
        self.entries
            .iter()
            .fold(0u32, |acc, c| acc.saturating_add(c.unread))
    }

    pub fn formatter(&self) -> &TimeFormatter {
        &self.formatter
    }

    // Stable: ties keep their previous relative order
    fn resort(&mut self) {
        self.entries
            .sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
    }
}
