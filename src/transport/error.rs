//! Transport error types

use thiserror::Error;

/// Transport error with classification
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Network, message)
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Server, message)
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Rejected, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Unavailable, message)
    }
}

/// Error classification, used for reporting only; nothing is retried automatically
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Connection dropped or timed out
    Network,
    /// Backend failed (5xx-like)
    Server,
    /// Backend refused the request
    Rejected,
    /// No backend configured or reachable
    Unavailable,
}

impl TransportErrorKind {
    /// Whether a manual retry by the user has a chance of succeeding
    pub fn is_transient(self) -> bool {
        matches!(self, Self::Network | Self::Server | Self::Unavailable)
    }
}
