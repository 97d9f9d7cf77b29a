//! Session runtime
//!
//! One `ChatRuntime` task owns the session state. Everything else talks to it
//! through a cloneable `SessionHandle` and listens for `RenderEvent`s on a
//! broadcast channel.

mod executor;


pub use executor::{spawn_session, ChatRuntime};

use crate::error::{ChatError, ChatResult};
use crate::model::{ChatEvent, ConversationId, Message};
use crate::render::{RenderEvent, SessionSnapshot};
use tokio::sync::{broadcast, mpsc, oneshot};

/// Requests from handles to the runtime task
#[derive(Debug)]
pub(crate) enum Command {
    Select {
        conversation_id: ConversationId,
        reply: oneshot::Sender<ChatResult<()>>,
    },
    Back,
    SetDraft(String),
    RefreshLabels,
    Submit {
        reply: oneshot::Sender<ChatResult<Message>>,
    },
    Receive {
        event: ChatEvent,
        reply: oneshot::Sender<ChatResult<()>>,
    },
    Snapshot {
        reply: oneshot::Sender<SessionSnapshot>,
    },
}

/// Handle to a running chat session
#[derive(Debug, Clone)]
pub struct SessionHandle {
    command_tx: mpsc::Sender<Command>,
    broadcast_tx: broadcast::Sender<RenderEvent>,
}

impl SessionHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<Command>,
        broadcast_tx: broadcast::Sender<RenderEvent>,
    ) -> Self {
        Self {
            command_tx,
            broadcast_tx,
        }
    }

    /// Open a conversation; its history is loaded in the background
    pub async fn select(&self, conversation_id: ConversationId) -> ChatResult<()> {
        let (reply, rx) = oneshot::channel();
        self.command(Command::Select {
            conversation_id,
            reply,
        })
        .await?;
        rx.await.map_err(|_| ChatError::SessionClosed)?
    }

    pub async fn back(&self) -> ChatResult<()> {
        self.command(Command::Back).await
    }

    /// Recompute directory time labels against the current clock
    pub async fn refresh_labels(&self) -> ChatResult<()> {
        self.command(Command::RefreshLabels).await
    }

    pub async fn set_draft(&self, text: impl Into<String>) -> ChatResult<()> {
        self.command(Command::SetDraft(text.into())).await
    }

    /// Send the current draft to the focused conversation.
    ///
    /// Resolves once the transport has acknowledged or refused it.
    pub async fn submit(&self) -> ChatResult<Message> {
        let (reply, rx) = oneshot::channel();
        self.command(Command::Submit { reply }).await?;
        rx.await.map_err(|_| ChatError::SessionClosed)?
    }

    /// Replace the draft with `text` and submit it
    pub async fn send(&self, text: impl Into<String>) -> ChatResult<Message> {
        self.set_draft(text).await?;
        self.submit().await
    }

    /// Record a message that arrived from outside the session
    pub async fn receive(&self, event: ChatEvent) -> ChatResult<()> {
        let (reply, rx) = oneshot::channel();
        self.command(Command::Receive { event, reply }).await?;
        rx.await.map_err(|_| ChatError::SessionClosed)?
    }

    pub async fn snapshot(&self) -> ChatResult<SessionSnapshot> {
        let (reply, rx) = oneshot::channel();
        self.command(Command::Snapshot { reply }).await?;
        rx.await.map_err(|_| ChatError::SessionClosed)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RenderEvent> {
        self.broadcast_tx.subscribe()
    }

    /// True once the runtime task has stopped
    pub fn is_closed(&self) -> bool {
        self.command_tx.is_closed()
    }

    async fn command(&self, command: Command) -> ChatResult<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| ChatError::SessionClosed)
    }
}
