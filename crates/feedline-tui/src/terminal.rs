//! Terminal driver for the TUI.
//!
//! Implements the [`Driver`] trait: crossterm for keyboard events, ratatui
//! for rendering, reqwest-backed posts calls spawned as background tasks
//! whose results come back through the completion channel, and the
//! WebSocket chat transport for the chat pane.

use std::{
    io::{self, Stdout, stdout},
    sync::Arc,
    time::Instant,
};

use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use feedline_app::{App, AppAction, AppEvent, Driver};
use feedline_client::{ChatConfig, ChatEvent, ChatHandle, GraphqlClient, PostsApi, SystemEnv, chat};
use feedline_core::{ChatMessage, NewPost, PostPatch};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::{Mutex, mpsc};

use crate::{InputState, KeyInput, ui};

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Terminal driver implementing the [`Driver`] trait.
///
/// Owns the input state for text editing and the handles to everything
/// asynchronous: background API tasks report into the completion channel,
/// the chat transport into its own.
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_stream: EventStream,
    input_state: InputState,
    api: PostsApi,
    graphql: Arc<Mutex<GraphqlClient<SystemEnv>>>,
    chat_config: ChatConfig,
    chat: Option<ChatHandle>,
    completions_tx: mpsc::UnboundedSender<AppEvent>,
    completions_rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl TerminalDriver {
    /// Create a new terminal driver, entering raw mode.
    pub fn new(
        api: PostsApi,
        graphql: GraphqlClient<SystemEnv>,
        chat_config: ChatConfig,
    ) -> Result<Self, TerminalError> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();

        Ok(Self {
            terminal,
            event_stream: EventStream::new(),
            input_state: InputState::new(),
            api,
            graphql: Arc::new(Mutex::new(graphql)),
            chat_config,
            chat: None,
            completions_tx,
            completions_rx,
        })
    }

    /// Convert crossterm `KeyCode` to `KeyInput`.
    fn convert_key(code: KeyCode) -> Option<KeyInput> {
        match code {
            KeyCode::Char(c) => Some(KeyInput::Char(c)),
            KeyCode::Enter => Some(KeyInput::Enter),
            KeyCode::Backspace => Some(KeyInput::Backspace),
            KeyCode::Delete => Some(KeyInput::Delete),
            KeyCode::Tab => Some(KeyInput::Tab),
            KeyCode::Esc => Some(KeyInput::Esc),
            KeyCode::Left => Some(KeyInput::Left),
            KeyCode::Right => Some(KeyInput::Right),
            KeyCode::Up => Some(KeyInput::Up),
            KeyCode::Down => Some(KeyInput::Down),
            KeyCode::Home => Some(KeyInput::Home),
            KeyCode::End => Some(KeyInput::End),
            _ => None,
        }
    }
}

impl Driver for TerminalDriver {
    type Error = TerminalError;
    type Instant = Instant;

    async fn poll_event(&mut self, app: &mut App) -> Result<Vec<AppAction>, Self::Error> {
        let timeout = tokio::time::Duration::from_millis(100);

        tokio::select! {
            biased;

            // Terminal events
            maybe_event = self.event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) if key_event.kind == KeyEventKind::Press => {
                        match Self::convert_key(key_event.code) {
                            Some(key_input) => Ok(self.input_state.handle_key(key_input, app)),
                            None => Ok(vec![]),
                        }
                    },
                    Some(Ok(Event::Resize(cols, rows))) => {
                        Ok(app.handle(AppEvent::Resize(cols, rows)))
                    },
                    Some(Err(e)) => Err(TerminalError::Io(e)),
                    _ => Ok(vec![]),
                }
            }

            // Background task completions (API results, query records)
            maybe_completion = self.completions_rx.recv() => {
                match maybe_completion {
                    Some(event) => Ok(app.handle(event)),
                    None => Ok(vec![]),
                }
            }

            // Tick timeout
            () = tokio::time::sleep(timeout) => {
                Ok(app.handle(AppEvent::Tick))
            }
        }
    }

    fn start_fetch_posts(&mut self, limit: u32, skip: u32) {
        let api = self.api.clone();
        let events = self.completions_tx.clone();
        tokio::spawn(async move {
            let event = match api.list(limit, skip).await {
                Ok(page) => AppEvent::PostsLoaded(page),
                Err(error) => AppEvent::Error { message: error.to_string() },
            };
            // A result arriving after shutdown is simply dropped.
            let _ = events.send(event);
        });
    }

    fn start_create_post(&mut self, post: NewPost) {
        let api = self.api.clone();
        let events = self.completions_tx.clone();
        tokio::spawn(async move {
            let event = match api.create(&post).await {
                Ok(created) => AppEvent::PostCreated(created),
                Err(error) => AppEvent::Error { message: error.to_string() },
            };
            let _ = events.send(event);
        });
    }

    fn start_update_post(&mut self, id: u64, patch: PostPatch) {
        let api = self.api.clone();
        let events = self.completions_tx.clone();
        tokio::spawn(async move {
            let event = match api.update(id, &patch).await {
                Ok(updated) => AppEvent::PostUpdated(updated),
                Err(error) => AppEvent::Error { message: error.to_string() },
            };
            let _ = events.send(event);
        });
    }

    fn start_delete_post(&mut self, id: u64) {
        let api = self.api.clone();
        let events = self.completions_tx.clone();
        tokio::spawn(async move {
            let event = match api.delete(id).await {
                Ok(()) => AppEvent::PostDeleted { id },
                Err(error) => AppEvent::Error { message: error.to_string() },
            };
            let _ = events.send(event);
        });
    }

    fn start_query(&mut self, query: String, variables: Option<Value>) {
        let graphql = Arc::clone(&self.graphql);
        let events = self.completions_tx.clone();
        tokio::spawn(async move {
            let mut client = graphql.lock().await;
            // Success and failure both land in history; the record is the
            // console's result either way.
            let _ = client.execute(&query, variables).await;
            match client.history().latest() {
                Some(record) => {
                    let _ = events.send(AppEvent::QueryFinished(record.clone()));
                },
                None => {
                    let _ = events.send(AppEvent::Error {
                        message: "query produced no history record".to_string(),
                    });
                },
            }
        });
    }

    fn connect_chat(&mut self) {
        if let Some(handle) = &self.chat {
            handle.stop();
        }
        self.chat = Some(chat::spawn(self.chat_config.clone()));
    }

    async fn send_chat(&mut self, message: ChatMessage) -> Result<(), Self::Error> {
        if let Some(handle) = &self.chat {
            if !handle.send(message).await {
                tracing::warn!("chat task is gone; dropping outbound message");
            }
        }
        Ok(())
    }

    fn recv_chat(&mut self) -> impl Future<Output = Option<ChatEvent>> + Send {
        std::future::ready(self.chat.as_mut().and_then(ChatHandle::try_next_event))
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        self.terminal.draw(|frame| {
            ui::render(frame, app, &self.input_state);
        })?;
        Ok(())
    }

    fn now(&self) -> Self::Instant {
        Instant::now()
    }

    fn stop(&mut self) {
        if let Some(handle) = &self.chat {
            handle.stop();
        }
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        self.stop();
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}
