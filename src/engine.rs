//! Reconciliation engine
//!
//! Every chat event, focus change and transport result enters here as an
//! `Event`. `reconcile` applies it to the session state and returns the
//! effects the runtime must carry out.

mod effect;
pub mod event;
mod reconcile;
pub mod state;

#[cfg(test)]
mod proptests;

pub use effect::{Effect, SendTicket};
pub use event::Event;
pub use reconcile::reconcile;
pub use state::ChatState;
