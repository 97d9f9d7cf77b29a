//! duopane - two-pane chat session engine
//!
//! Keeps a conversation directory and per-conversation message logs
//! consistent as messages arrive, sends go out and focus moves between
//! conversations. Rendering is left to whoever holds a `SessionHandle`.

pub mod clock;
pub mod config;
pub mod directory;
pub mod engine;
pub mod error;
pub mod focus;
pub mod model;
pub mod render;
pub mod runtime;
pub mod seed;
pub mod store;
pub mod transport;

pub use clock::{Clock, FixedClock, Locale, SystemClock, TimeFormatter};
pub use config::{SessionConfig, UnknownConversationPolicy};
pub use error::{ChatError, ChatResult};
pub use model::{ChatEvent, Conversation, ConversationId, Message, MessageId};
pub use render::{ConversationView, MessageView, RenderEvent, SessionSnapshot};
pub use runtime::{spawn_session, ChatRuntime, SessionHandle};
pub use transport::{InMemoryTransport, Transport, TransportError, TransportErrorKind};
