//! WebSocket chat transport.
//!
//! Owns exactly one live connection per spawned chat task. The task is a
//! thin I/O layer bridged to the caller over channels: outbound
//! [`ChatMessage`]s are serialized to JSON text frames, inbound text frames
//! are parsed and surfaced as [`ChatEvent`]s. Echo reconciliation and all
//! other session logic stay in the sans-IO `feedline-core` session.
//!
//! Reconnection is driven by the configured [`ReconnectPolicy`]: the main
//! chat flow uses fire-once (a disconnect is final), while durable sessions
//! retry a bounded number of times with increasing delay. Explicit teardown
//! (dropping the handle's outbound side or calling
//! [`ChatHandle::stop`]) always ends the task without reconnecting.

use feedline_core::{ChatMessage, ReconnectPolicy};
use futures_util::{SinkExt, StreamExt};
use tokio::{net::TcpStream, sync::mpsc};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

/// Default chat endpoint: a public echo server.
pub const DEFAULT_CHAT_URL: &str = "wss://echo.websocket.org";

/// Channel depth between the caller and the connection task.
const CHANNEL_CAPACITY: usize = 32;

/// Transport-level notifications delivered to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// The connection handshake completed; sends will be transmitted.
    Opened,
    /// An inbound message frame.
    Frame(ChatMessage),
    /// A transport error. Does not imply the connection closed; a
    /// [`ChatEvent::Closed`] follows if it did.
    Error {
        /// Error description.
        message: String,
    },
    /// The connection closed (peer close, transport failure, or teardown).
    Closed,
}

/// Chat transport configuration.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// WebSocket endpoint URL.
    pub url: String,
    /// Reconnection behavior after a disconnect.
    pub policy: ReconnectPolicy,
}

impl ChatConfig {
    /// Connect once and stay down after any disconnect.
    pub fn fire_once(url: impl Into<String>) -> Self {
        Self { url: url.into(), policy: ReconnectPolicy::FireOnce }
    }

    /// Connect with the given reconnect policy.
    pub fn with_policy(url: impl Into<String>, policy: ReconnectPolicy) -> Self {
        Self { url: url.into(), policy }
    }
}

/// Handle to a spawned chat connection task.
///
/// Messages are sent and events received via the channels; the task owns
/// the socket. Dropping the handle (or calling [`ChatHandle::stop`]) tears
/// the connection down.
pub struct ChatHandle {
    outbound: mpsc::Sender<ChatMessage>,
    events: mpsc::Receiver<ChatEvent>,
    abort: tokio::task::AbortHandle,
}

impl ChatHandle {
    /// Queue a message for transmission. Returns false if the connection
    /// task has already ended.
    pub async fn send(&self, message: ChatMessage) -> bool {
        self.outbound.send(message).await.is_ok()
    }

    /// Wait for the next transport event. `None` once the task has ended.
    pub async fn next_event(&mut self) -> Option<ChatEvent> {
        self.events.recv().await
    }

    /// Take an already-delivered event without waiting.
    pub fn try_next_event(&mut self) -> Option<ChatEvent> {
        self.events.try_recv().ok()
    }

    /// Tear the connection down. No further reconnection is attempted.
    pub fn stop(&self) {
        self.abort.abort();
    }
}

/// Spawn a chat connection task for the given configuration.
pub fn spawn(config: ChatConfig) -> ChatHandle {
    let (outbound_tx, outbound_rx) = mpsc::channel(CHANNEL_CAPACITY);
    let (events_tx, events_rx) = mpsc::channel(CHANNEL_CAPACITY);

    let task = tokio::spawn(run(config, outbound_rx, events_tx));

    ChatHandle { outbound: outbound_tx, events: events_rx, abort: task.abort_handle() }
}

/// Why a connection's pump loop ended.
enum PumpEnd {
    /// The caller dropped the outbound channel: explicit teardown.
    CallerClosed,
    /// The connection itself ended (peer close or transport failure).
    ConnectionEnded,
}

/// Connection loop: connect, pump, and apply the reconnect policy.
async fn run(
    config: ChatConfig,
    mut outbound: mpsc::Receiver<ChatMessage>,
    events: mpsc::Sender<ChatEvent>,
) {
    let mut attempts: u32 = 0;

    loop {
        match connect_async(config.url.as_str()).await {
            Ok((socket, _response)) => {
                attempts = 0;
                if events.send(ChatEvent::Opened).await.is_err() {
                    return;
                }

                let end = pump(socket, &mut outbound, &events).await;
                if events.send(ChatEvent::Closed).await.is_err() {
                    return;
                }
                if matches!(end, PumpEnd::CallerClosed) {
                    return;
                }
            },
            Err(error) => {
                tracing::warn!(url = %config.url, %error, "chat connect failed");
                if events.send(ChatEvent::Error { message: error.to_string() }).await.is_err() {
                    return;
                }
            },
        }

        match config.policy.next_delay(attempts) {
            Some(delay) => {
                attempts += 1;
                tracing::info!(attempt = attempts, ?delay, "reconnecting chat");
                tokio::time::sleep(delay).await;
            },
            None => return,
        }
    }
}

/// Bridge one live socket: serialize outbound messages, parse inbound
/// frames. Malformed inbound payloads are dropped and logged, never
/// surfaced as errors.
async fn pump(
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
    outbound: &mut mpsc::Receiver<ChatMessage>,
    events: &mpsc::Sender<ChatEvent>,
) -> PumpEnd {
    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            maybe_message = outbound.recv() => match maybe_message {
                Some(message) => match message.to_json() {
                    Ok(text) => {
                        if let Err(error) = sink.send(Message::text(text)).await {
                            tracing::warn!(%error, "chat send failed");
                            let _ = events
                                .send(ChatEvent::Error { message: error.to_string() })
                                .await;
                            return PumpEnd::ConnectionEnded;
                        }
                    },
                    Err(error) => {
                        tracing::warn!(%error, "dropping unencodable chat message");
                    },
                },
                None => {
                    let _ = sink.send(Message::Close(None)).await;
                    return PumpEnd::CallerClosed;
                },
            },

            maybe_frame = stream.next() => match maybe_frame {
                Some(Ok(Message::Text(text))) => match ChatMessage::from_json(text.as_str()) {
                    Ok(message) => {
                        if events.send(ChatEvent::Frame(message)).await.is_err() {
                            return PumpEnd::CallerClosed;
                        }
                    },
                    Err(error) => {
                        tracing::warn!(%error, "dropping malformed chat frame");
                    },
                },
                Some(Ok(Message::Close(_))) | None => return PumpEnd::ConnectionEnded,
                // Ping/pong are handled inside the socket; binary frames
                // carry nothing we speak.
                Some(Ok(_)) => {},
                Some(Err(error)) => {
                    tracing::warn!(%error, "chat receive failed");
                    let _ = events.send(ChatEvent::Error { message: error.to_string() }).await;
                    return PumpEnd::ConnectionEnded;
                },
            },
        }
    }
}
