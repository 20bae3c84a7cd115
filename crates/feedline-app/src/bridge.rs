//! Transport-to-application translation layer.
//!
//! The [`Bridge`] wraps the sans-IO [`ChatSession`] and adapts it to the
//! application lifecycle:
//!
//! - Turns send intents into session calls, buffering the resulting
//!   outgoing messages for the driver's next I/O cycle.
//! - Interprets transport events and converts them into [`AppEvent`]s.
//! - Drives session housekeeping (pending-echo expiry) on ticks.

use feedline_client::ChatEvent;
use feedline_core::{ChatMessage, ChatSession, Environment, ReceiveOutcome};

use crate::AppEvent;

/// Bridge between App intents and the chat session.
///
/// Generic over [`Environment`] to support both production and
/// simulation. The session's instant type is the environment's.
pub struct Bridge<E: Environment> {
    env: E,
    session: ChatSession<E::Instant>,
    username: String,
    user_id: String,
    outgoing: Vec<ChatMessage>,
}

impl<E: Environment> Bridge<E> {
    /// Create a bridge for the given display name.
    ///
    /// The client's opaque user id is generated once and reused for every
    /// message and every reconnection.
    pub fn new(env: E, username: impl Into<String>) -> Self {
        let username = username.into();
        let user_id = format!("user-{}", env.random_id());
        let session = ChatSession::new(username.clone(), user_id.clone());
        Self { env, session, username, user_id, outgoing: Vec::new() }
    }

    /// The wrapped session.
    pub fn session(&self) -> &ChatSession<E::Instant> {
        &self.session
    }

    /// Change the display name used for subsequent messages.
    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = username.into();
        self.session.set_username(self.username.clone());
    }

    /// Begin a fresh connection attempt.
    ///
    /// The previous session's per-connection state (pending echoes) is
    /// discarded; the message view the App mirrors is unaffected.
    pub fn start_connection(&mut self) {
        self.session = ChatSession::new(self.username.clone(), self.user_id.clone());
    }

    /// Author a message and queue it for transmission.
    ///
    /// On success the optimistic local append surfaces as a
    /// [`AppEvent::ChatMessageAppended`]; the message itself is picked up
    /// by [`Bridge::take_outgoing`]. A send while not connected surfaces
    /// as an error event, not a failure of the bridge.
    pub fn send_chat(&mut self, text: &str) -> Vec<AppEvent> {
        let id = self.env.random_id();
        let sent_at = self.env.now();
        let timestamp = self.env.wall_clock();

        match self.session.send(id, text, sent_at, timestamp) {
            Ok(message) => {
                self.outgoing.push(message.clone());
                vec![AppEvent::ChatMessageAppended(message)]
            },
            Err(error) => vec![AppEvent::Error { message: error.to_string() }],
        }
    }

    /// Translate a transport event into app events.
    ///
    /// Echoes of our own messages are reconciled away here and produce no
    /// event at all; the optimistic append already made them visible.
    pub fn handle_transport_event(&mut self, event: ChatEvent) -> Vec<AppEvent> {
        match event {
            ChatEvent::Opened => {
                self.session.handle_open();
                vec![AppEvent::ChatOpened]
            },
            ChatEvent::Frame(message) => match self.session.receive(message.clone()) {
                ReceiveOutcome::Appended => vec![AppEvent::ChatMessageAppended(message)],
                ReceiveOutcome::EchoConfirmed => vec![],
            },
            ChatEvent::Error { message } => {
                self.session.handle_error(message.clone());
                vec![AppEvent::Error { message }]
            },
            ChatEvent::Closed => {
                self.session.handle_close();
                vec![AppEvent::ChatClosed]
            },
        }
    }

    /// Process a time tick: expire stale pending echoes.
    pub fn handle_tick(&mut self) -> Vec<AppEvent> {
        let dropped = self.session.tick(self.env.now());
        if dropped > 0 {
            tracing::warn!(dropped, "expired pending chat echoes");
        }
        vec![]
    }

    /// Take pending outgoing messages.
    pub fn take_outgoing(&mut self) -> Vec<ChatMessage> {
        std::mem::take(&mut self.outgoing)
    }
}
