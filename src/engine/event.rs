//! Events accepted by the engine

use super::effect::SendTicket;
use crate::model::{ChatEvent, ConversationId, Message};
use crate::transport::TransportError;

#[derive(Debug, Clone)]
pub enum Event {
    // User intents
    Select {
        conversation_id: ConversationId,
    },
    Back,
    DraftChanged {
        text: String,
    },
    SubmitDraft {
        ticket: SendTicket,
    },

    // Clock moved on, e.g. past midnight
    RefreshLabels,

    // A message from a peer, or any externally recorded message
    Incoming(ChatEvent),

    // Transport results
    HistoryLoaded {
        conversation_id: ConversationId,
        generation: u64,
        messages: Vec<Message>,
    },
    HistoryFailed {
        conversation_id: ConversationId,
        generation: u64,
        error: TransportError,
    },
    SendAcknowledged {
        ticket: SendTicket,
        conversation_id: ConversationId,
        /// Draft text as it was submitted
        text: String,
        message: Message,
    },
    SendFailed {
        ticket: SendTicket,
        conversation_id: ConversationId,
        text: String,
        error: TransportError,
    },
}
