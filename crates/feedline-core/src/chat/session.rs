//! Chat session state machine.
//!
//! Owns exactly one logical connection's worth of state: the visible
//! message list, the set of locally-sent message ids awaiting their server
//! echo, and connection health. Pure state machine in the action pattern:
//! no I/O, time passed in as parameters, generic over the instant type so
//! the same code runs against real and virtual clocks.
//!
//! # State machine
//!
//! ```text
//! ┌────────────┐  open   ┌──────┐  close/teardown  ┌────────┐
//! │ Connecting │────────>│ Open │─────────────────>│ Closed │
//! └────────────┘         └──────┘                  └────────┘
//! ```
//!
//! Transport errors set a sticky error string but do not transition the
//! machine; only a genuine close event reaches `Closed`.

use std::{
    collections::HashMap,
    ops::Sub,
    time::{Duration, Instant},
};

use chrono::{DateTime, Utc};

use crate::{
    chat::message::{ChatMessage, MessageKind},
    error::ChatError,
};

/// How long a sent message id is tracked while waiting for its echo.
///
/// The echo endpoint normally reflects a frame within a round trip; an id
/// still pending after this long is considered lost and dropped so the
/// pending set cannot grow without bound. An echo arriving after expiry is
/// appended as a late duplicate rather than silently discarded.
pub const PENDING_ECHO_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection lifecycle as observed by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Connection attempt in progress (initial state).
    Connecting,
    /// Handshake completed; sends are accepted.
    Open,
    /// Connection ended (expected or errored) or torn down.
    Closed,
}

/// What happened to an inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiveOutcome {
    /// New content; the message was appended to the visible list.
    Appended,
    /// The server's echo of a message this client already rendered
    /// optimistically; the duplicate was discarded.
    EchoConfirmed,
}

/// Sans-IO chat session.
///
/// Generic over `I` (instant type) to support both production
/// (`std::time::Instant`) and simulation (virtual time) environments.
#[derive(Debug, Clone)]
pub struct ChatSession<I = Instant>
where
    I: Copy + Ord + Send + Sync + Sub<Output = Duration>,
{
    /// Connection lifecycle state.
    state: SessionState,
    /// Display name stamped on outgoing messages.
    username: String,
    /// Stable opaque id for this client, stamped on outgoing messages.
    user_id: String,
    /// Visible messages in append order.
    messages: Vec<ChatMessage>,
    /// Ids sent by this client and not yet observed echoed, with the
    /// instant they were sent (for expiry).
    pending: HashMap<String, I>,
    /// Sticky description of the most recent transport error.
    last_error: Option<String>,
}

impl<I> ChatSession<I>
where
    I: Copy + Ord + Send + Sync + Sub<Output = Duration>,
{
    /// Create a session in the [`SessionState::Connecting`] state.
    pub fn new(username: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            state: SessionState::Connecting,
            username: username.into(),
            user_id: user_id.into(),
            messages: Vec::new(),
            pending: HashMap::new(),
            last_error: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// True while sends are accepted.
    pub fn is_open(&self) -> bool {
        self.state == SessionState::Open
    }

    /// Display name stamped on outgoing messages.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Change the display name for subsequent messages.
    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = username.into();
    }

    /// Visible messages in append order.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Most recent transport error, if any. Cleared when the connection
    /// opens.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Number of sent messages still awaiting their echo.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// The connection completed its handshake.
    pub fn handle_open(&mut self) {
        self.state = SessionState::Open;
        self.last_error = None;
    }

    /// A transport error occurred. Sets the error flag only; the state
    /// machine moves to [`SessionState::Closed`] on an actual close event.
    pub fn handle_error(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
    }

    /// The connection closed (expected, errored, or explicit teardown).
    ///
    /// Pending echo tracking is cleared: entries are meaningless once the
    /// connection they were sent on is gone.
    pub fn handle_close(&mut self) {
        self.state = SessionState::Closed;
        self.pending.clear();
    }

    /// Author and append a message, returning it for transmission.
    ///
    /// Rejects with [`ChatError::NotConnected`] unless the session is open.
    /// The id is registered as pending before the message becomes visible:
    /// the echo may race back the moment the frame leaves, and must find
    /// the id already tracked.
    pub fn send(
        &mut self,
        id: impl Into<String>,
        text: impl Into<String>,
        sent_at: I,
        timestamp: DateTime<Utc>,
    ) -> Result<ChatMessage, ChatError> {
        if self.state != SessionState::Open {
            return Err(ChatError::NotConnected);
        }

        let id = id.into();
        let message = ChatMessage {
            id: id.clone(),
            user_id: self.user_id.clone(),
            username: self.username.clone(),
            text: text.into(),
            timestamp,
            kind: MessageKind::Message,
        };

        self.pending.insert(id, sent_at);
        self.messages.push(message.clone());

        Ok(message)
    }

    /// Reconcile an inbound message against the pending set.
    ///
    /// An id we sent ourselves is the server echoing our frame back: the
    /// entry is released and the duplicate discarded. Everything else
    /// (other participants, system/join/leave notices) is appended.
    pub fn receive(&mut self, message: ChatMessage) -> ReceiveOutcome {
        if self.pending.remove(&message.id).is_some() {
            return ReceiveOutcome::EchoConfirmed;
        }

        self.messages.push(message);
        ReceiveOutcome::Appended
    }

    /// Periodic housekeeping: expire pending ids older than
    /// [`PENDING_ECHO_TIMEOUT`]. Returns how many entries were dropped.
    pub fn tick(&mut self, now: I) -> usize {
        let before = self.pending.len();
        self.pending.retain(|_, sent_at| now - *sent_at <= PENDING_ECHO_TIMEOUT);
        before - self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Virtual instant measured in milliseconds, for expiry tests.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    struct Ms(u64);

    impl Sub for Ms {
        type Output = Duration;
        fn sub(self, rhs: Self) -> Duration {
            Duration::from_millis(self.0.saturating_sub(rhs.0))
        }
    }

    fn open_session() -> ChatSession<Ms> {
        let mut session = ChatSession::new("Guest", "user-1");
        session.handle_open();
        session
    }

    fn foreign_message(id: &str) -> ChatMessage {
        ChatMessage {
            id: id.into(),
            user_id: "user-other".into(),
            username: "Other".into(),
            text: "hi".into(),
            timestamp: DateTime::<Utc>::UNIX_EPOCH,
            kind: MessageKind::Message,
        }
    }

    #[test]
    fn send_appends_optimistically_and_tracks_pending() {
        let mut session = open_session();

        let message =
            session.send("m1", "hello", Ms(0), DateTime::<Utc>::UNIX_EPOCH).unwrap();

        assert_eq!(message.kind, MessageKind::Message);
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.pending_count(), 1);
    }

    #[test]
    fn echo_is_discarded_leaving_one_entry() {
        let mut session = open_session();

        let sent = session.send("m1", "hello", Ms(0), DateTime::<Utc>::UNIX_EPOCH).unwrap();
        let outcome = session.receive(sent);

        assert_eq!(outcome, ReceiveOutcome::EchoConfirmed);
        assert_eq!(session.messages().iter().filter(|m| m.id == "m1").count(), 1);
        assert_eq!(session.pending_count(), 0);
    }

    #[test]
    fn foreign_id_always_appends() {
        let mut session = open_session();

        assert_eq!(session.receive(foreign_message("other-1")), ReceiveOutcome::Appended);
        assert_eq!(session.messages().len(), 1);
    }

    #[test]
    fn send_while_not_open_is_rejected() {
        let mut session: ChatSession<Ms> = ChatSession::new("Guest", "user-1");

        let result = session.send("m1", "hello", Ms(0), DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(result, Err(ChatError::NotConnected));
        assert!(session.messages().is_empty());

        session.handle_open();
        session.handle_close();
        let result = session.send("m2", "hello", Ms(0), DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(result, Err(ChatError::NotConnected));
    }

    #[test]
    fn error_sets_flag_without_closing() {
        let mut session = open_session();

        session.handle_error("connection error");
        assert_eq!(session.state(), SessionState::Open);
        assert_eq!(session.last_error(), Some("connection error"));

        // Reopening (e.g. after a retry) clears the flag.
        session.handle_open();
        assert_eq!(session.last_error(), None);
    }

    #[test]
    fn close_clears_pending() {
        let mut session = open_session();
        let _ = session.send("m1", "hello", Ms(0), DateTime::<Utc>::UNIX_EPOCH);

        session.handle_close();
        assert_eq!(session.state(), SessionState::Closed);
        assert_eq!(session.pending_count(), 0);
    }

    #[test]
    fn stale_pending_ids_expire() {
        let mut session = open_session();
        let _ = session.send("m1", "hello", Ms(0), DateTime::<Utc>::UNIX_EPOCH);

        // Not yet stale.
        assert_eq!(session.tick(Ms(PENDING_ECHO_TIMEOUT.as_millis() as u64)), 0);
        assert_eq!(session.pending_count(), 1);

        // One millisecond past the timeout.
        assert_eq!(session.tick(Ms(PENDING_ECHO_TIMEOUT.as_millis() as u64 + 1)), 1);
        assert_eq!(session.pending_count(), 0);
    }

    #[test]
    fn late_echo_after_expiry_appends_duplicate() {
        let mut session = open_session();
        let sent = session.send("m1", "hello", Ms(0), DateTime::<Utc>::UNIX_EPOCH).unwrap();

        let _ = session.tick(Ms(PENDING_ECHO_TIMEOUT.as_millis() as u64 + 1));

        assert_eq!(session.receive(sent), ReceiveOutcome::Appended);
        assert_eq!(session.messages().iter().filter(|m| m.id == "m1").count(), 2);
    }
}
