//! Error types for the chat session layer.
//!
//! Strongly-typed errors rather than stringly-typed ones so callers can
//! distinguish state-dependent conditions (retry once connected) from
//! genuine failures.

use thiserror::Error;

/// Errors produced by the chat session state machine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// A send was attempted while the connection is not open.
    ///
    /// This is a transient, state-dependent condition: the same send is
    /// expected to succeed once the session reports open again.
    #[error("cannot send message: not connected")]
    NotConnected,
}

impl ChatError {
    /// Returns true if this error is transient and may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::NotConnected)
    }
}
