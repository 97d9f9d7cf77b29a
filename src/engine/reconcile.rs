//! Event application
//!
//! Unread rules:
//! - a message for the focused conversation never counts as unread
//! - a message written by the local user never counts as unread
//! - anything else adds one
//!
//! Sends go through the transport first; only an acknowledged message is
//! recorded.

use super::{ChatState, Effect, Event};
use crate::error::{ChatError, ChatResult};
use crate::model::{ChatEvent, ConversationId, Message};
use crate::render::RenderEvent;

/// Apply one event to the session state.
///
/// On `Err` the state is unchanged.
pub fn reconcile(state: &mut ChatState, event: Event) -> ChatResult<Vec<Effect>> {
    match event {
        Event::Select { conversation_id } => {
            let generation = state.select(conversation_id)?;
            tracing::debug!(conversation_id = %conversation_id, generation, "Focus moved");
            Ok(vec![
                Effect::render(state.focus_event()),
                Effect::render(state.directory_event()),
                Effect::FetchHistory {
                    conversation_id,
                    generation,
                },
            ])
        }

        Event::Back => {
            state.back();
            Ok(vec![Effect::render(state.focus_event())])
        }

        Event::RefreshLabels => {
            state.relabel();
            Ok(vec![Effect::render(state.directory_event())])
        }

        Event::DraftChanged { text } => {
            state.set_draft(text);
            Ok(vec![])
        }

        Event::SubmitDraft { ticket } => {
            let (conversation_id, text) = state.submission()?;
            Ok(vec![Effect::SendMessage {
                ticket,
                conversation_id,
                text,
            }])
        }

        Event::Incoming(chat) => {
            let conversation_id = chat.conversation_id;
            let message = state.record_event(chat)?;
            Ok(recorded_effects(state, conversation_id, &message))
        }

        Event::HistoryLoaded {
            conversation_id,
            generation,
            messages,
        } => {
            if state.apply_history(conversation_id, generation, messages) {
                let messages = state
                    .focus()
                    .visible()
                    .iter()
                    .map(|m| state.message_view(m))
                    .collect();
                Ok(vec![Effect::render(RenderEvent::History {
                    conversation_id,
                    messages,
                })])
            } else {
                tracing::debug!(
                    conversation_id = %conversation_id,
                    generation,
                    "Discarding stale history load"
                );
                Ok(vec![])
            }
        }

        Event::HistoryFailed {
            conversation_id,
            generation,
            error,
        } => {
            tracing::warn!(conversation_id = %conversation_id, error = %error, "History load failed");
            if state.fail_history(conversation_id, generation) {
                Ok(vec![Effect::render(RenderEvent::HistoryFailed {
                    conversation_id,
                    error: error.to_string(),
                })])
            } else {
                Ok(vec![])
            }
        }

        Event::SendAcknowledged {
            ticket,
            conversation_id,
            text,
            message,
        } => {
            // Author is always the local user; id and timestamp come from the transport
            let chat = ChatEvent {
                conversation_id,
                author: state.local_user().to_string(),
                body: message.body,
                timestamp: message.timestamp,
                message_id: Some(message.id),
            };
            match state.record_event(chat) {
                Ok(recorded) => {
                    let mut effects = recorded_effects(state, conversation_id, &recorded);
                    if state.clear_draft_if(&text) {
                        effects.push(Effect::render(RenderEvent::DraftCleared));
                    }
                    effects.push(Effect::CompleteSend {
                        ticket,
                        result: Ok(recorded),
                    });
                    Ok(effects)
                }
                Err(e) => Ok(vec![Effect::CompleteSend {
                    ticket,
                    result: Err(e),
                }]),
            }
        }

        Event::SendFailed {
            ticket,
            conversation_id,
            text: _,
            error,
        } => {
            tracing::warn!(
                conversation_id = %conversation_id,
                error = %error,
                transient = error.kind.is_transient(),
                "Send failed"
            );
            Ok(vec![
                Effect::render(RenderEvent::SendFailed {
                    conversation_id,
                    draft: state.draft().to_string(),
                    error: error.to_string(),
                }),
                Effect::CompleteSend {
                    ticket,
                    result: Err(ChatError::Transport(error)),
                },
            ])
        }
    }
}

fn recorded_effects(
    state: &ChatState,
    conversation_id: ConversationId,
    message: &Message,
) -> Vec<Effect> {
    let mut effects = Vec::with_capacity(2);
    if state.focus().is_focused(conversation_id) {
        effects.push(Effect::render(RenderEvent::Appended {
            conversation_id,
            message: state.message_view(message),
        }));
    }
    effects.push(Effect::render(state.directory_event()));
    effects
}
