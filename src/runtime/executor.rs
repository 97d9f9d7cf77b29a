//! Session runtime executor

use super::{Command, SessionHandle};
use crate::clock::Clock;
use crate::config::SessionConfig;
use crate::engine::{reconcile, ChatState, Effect, Event, SendTicket};
use crate::error::{ChatError, ChatResult};
use crate::model::{ConversationId, Message};
use crate::render::RenderEvent;
use crate::transport::Transport;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Capacity of the channel carrying transport results back into the loop
const EVENT_BUFFER: usize = 32;

/// A send waiting for the transport, in submission order
#[derive(Debug)]
struct SendJob {
    ticket: SendTicket,
    conversation_id: ConversationId,
    text: String,
}

/// Owns the session state and applies commands and transport results to it
/// one at a time.
pub struct ChatRuntime<T: Transport + 'static> {
    state: ChatState,
    transport: Arc<T>,
    command_rx: mpsc::Receiver<Command>,
    event_tx: mpsc::Sender<Event>,
    event_rx: mpsc::Receiver<Event>,
    broadcast_tx: broadcast::Sender<RenderEvent>,
    send_tx: mpsc::UnboundedSender<SendJob>,
    /// Taken by `run` to start the send worker
    send_rx: Option<mpsc::UnboundedReceiver<SendJob>>,
    pending_sends: HashMap<SendTicket, oneshot::Sender<ChatResult<Message>>>,
    next_ticket: u64,
    cancel: CancellationToken,
}

impl<T: Transport + 'static> ChatRuntime<T> {
    pub fn new(
        config: &SessionConfig,
        transport: T,
        clock: Arc<dyn Clock>,
    ) -> (Self, SessionHandle) {
        let (command_tx, command_rx) = mpsc::channel(config.command_buffer.max(1));
        let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);
        let (broadcast_tx, _) = broadcast::channel(config.render_buffer.max(1));
        let (send_tx, send_rx) = mpsc::unbounded_channel();

        let handle = SessionHandle::new(command_tx, broadcast_tx.clone());
        let runtime = Self {
            state: ChatState::new(config, clock),
            transport: Arc::new(transport),
            command_rx,
            event_tx,
            event_rx,
            broadcast_tx,
            send_tx,
            send_rx: Some(send_rx),
            pending_sends: HashMap::new(),
            next_ticket: 0,
            cancel: CancellationToken::new(),
        };
        (runtime, handle)
    }

    /// Stop the runtime when `token` is cancelled
    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub async fn run(mut self) {
        tracing::info!(
            conversations = self.state.directory().len(),
            local_user = %self.state.local_user(),
            "Starting chat runtime"
        );

        if let Some(send_rx) = self.send_rx.take() {
            tokio::spawn(send_worker(
                Arc::clone(&self.transport),
                send_rx,
                self.event_tx.clone(),
            ));
        }

        loop {
            tokio::select! {
                () = self.cancel.cancelled() => {
                    tracing::debug!("Chat runtime cancelled");
                    break;
                }
                command = self.command_rx.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                Some(event) = self.event_rx.recv() => {
                    if let Err(e) = self.process_event(event) {
                        tracing::error!(error = %e, "Error applying transport result");
                    }
                }
            }
        }

        tracing::info!(pending_sends = self.pending_sends.len(), "Chat runtime stopped");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Select {
                conversation_id,
                reply,
            } => {
                let result = self.process_event(Event::Select { conversation_id });
                let _ = reply.send(result);
            }
            Command::Back => {
                if let Err(e) = self.process_event(Event::Back) {
                    tracing::warn!(error = %e, "Back failed");
                }
            }
            Command::SetDraft(text) => {
                if let Err(e) = self.process_event(Event::DraftChanged { text }) {
                    tracing::warn!(error = %e, "Draft update failed");
                }
            }
            Command::RefreshLabels => {
                if let Err(e) = self.process_event(Event::RefreshLabels) {
                    tracing::warn!(error = %e, "Label refresh failed");
                }
            }
            Command::Submit { reply } => {
                self.next_ticket += 1;
                let ticket = SendTicket(self.next_ticket);
                self.pending_sends.insert(ticket, reply);
                if let Err(e) = self.process_event(Event::SubmitDraft { ticket }) {
                    tracing::debug!(error = %e, "Submit rejected");
                    if let Some(reply) = self.pending_sends.remove(&ticket) {
                        let _ = reply.send(Err(e));
                    }
                }
            }
            Command::Receive { event, reply } => {
                let result = self.process_event(Event::Incoming(event));
                if let Err(e) = &result {
                    tracing::warn!(error = %e, "Incoming message rejected");
                }
                let _ = reply.send(result);
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.state.snapshot());
            }
        }
    }

    fn process_event(&mut self, event: Event) -> ChatResult<()> {
        let effects = reconcile(&mut self.state, event)?;
        for effect in effects {
            self.execute_effect(effect);
        }
        Ok(())
    }

    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::FetchHistory {
                conversation_id,
                generation,
            } => {
                let transport = Arc::clone(&self.transport);
                let event_tx = self.event_tx.clone();
                tokio::spawn(async move {
                    let event = match transport.fetch_messages(conversation_id).await {
                        Ok(messages) => Event::HistoryLoaded {
                            conversation_id,
                            generation,
                            messages,
                        },
                        Err(error) => Event::HistoryFailed {
                            conversation_id,
                            generation,
                            error,
                        },
                    };
                    let _ = event_tx.send(event).await;
                });
            }

            Effect::SendMessage {
                ticket,
                conversation_id,
                text,
            } => {
                let job = SendJob {
                    ticket,
                    conversation_id,
                    text,
                };
                if self.send_tx.send(job).is_err() {
                    tracing::error!(conversation_id = %conversation_id, "Send worker is gone");
                    if let Some(reply) = self.pending_sends.remove(&ticket) {
                        let _ = reply.send(Err(ChatError::SessionClosed));
                    }
                }
            }

            Effect::Render(event) => {
                // No subscribers is fine
                let _ = self.broadcast_tx.send(event);
            }

            Effect::CompleteSend { ticket, result } => {
                match self.pending_sends.remove(&ticket) {
                    Some(reply) => {
                        let _ = reply.send(result);
                    }
                    None => tracing::debug!(ticket = ticket.0, "No caller waiting for send"),
                }
            }
        }
    }
}

/// Deliver sends one at a time so a conversation's messages keep submission order
async fn send_worker<T: Transport + 'static>(
    transport: Arc<T>,
    mut jobs: mpsc::UnboundedReceiver<SendJob>,
    event_tx: mpsc::Sender<Event>,
) {
    while let Some(job) = jobs.recv().await {
        let SendJob {
            ticket,
            conversation_id,
            text,
        } = job;
        let event = match transport.send_message(conversation_id, &text).await {
            Ok(message) => Event::SendAcknowledged {
                ticket,
                conversation_id,
                text,
                message,
            },
            Err(error) => Event::SendFailed {
                ticket,
                conversation_id,
                text,
                error,
            },
        };
        if event_tx.send(event).await.is_err() {
            break;
        }
    }
}

/// Start a session on the current tokio runtime
pub fn spawn_session<T: Transport + 'static>(
    config: &SessionConfig,
    transport: T,
    clock: Arc<dyn Clock>,
) -> (SessionHandle, JoinHandle<()>) {
    let (runtime, handle) = ChatRuntime::new(config, transport, clock);
    let task = tokio::spawn(runtime.run());
    (handle, task)
}
