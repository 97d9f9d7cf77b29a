//! Effects produced by reconciliation

use crate::error::ChatResult;
use crate::model::{ConversationId, Message};
use crate::render::RenderEvent;

/// Correlates a submitted draft with its eventual transport outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SendTicket(pub u64);

/// Effects to be executed by the runtime after an event is applied
#[derive(Debug, Clone)]
pub enum Effect {
    /// Load a conversation's full log from the transport
    FetchHistory {
        conversation_id: ConversationId,
        generation: u64,
    },

    /// Hand composed text to the transport
    SendMessage {
        ticket: SendTicket,
        conversation_id: ConversationId,
        text: String,
    },

    /// Notify the render collaborator
    Render(RenderEvent),

    /// Report the outcome of a send to whoever submitted it
    CompleteSend {
        ticket: SendTicket,
        result: ChatResult<Message>,
    },
}

impl Effect {
    pub fn render(event: RenderEvent) -> Self {
        Effect::Render(event)
    }
}
