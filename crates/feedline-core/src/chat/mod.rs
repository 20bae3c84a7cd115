//! Chat domain: message wire types, the session state machine, and the
//! reconnect policy shared by the transport layer.

mod message;
mod retry;
mod session;

pub use message::{ChatMessage, MessageKind};
pub use retry::{
    DEFAULT_MAX_RECONNECT_ATTEMPTS, DEFAULT_RETRY_BASE_DELAY, ReconnectPolicy,
};
pub use session::{ChatSession, PENDING_ECHO_TIMEOUT, ReceiveOutcome, SessionState};
