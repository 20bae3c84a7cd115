//! Application state machine.
//!
//! The [`App`] manages the interactive state of the application completely
//! decoupled from I/O: it consumes [`AppEvent`] inputs and produces
//! [`AppAction`] instructions for the runtime to execute.
//!
//! # Responsibilities
//!
//! - Holds the feed (bounded page + filters + derived view), the chat
//!   view, and the console history mirror.
//! - Tracks chat connection state for UI feedback.
//! - Stores terminal dimensions to handle resize events.

use feedline_core::{DEFAULT_HISTORY_CAPACITY, NewPost, PostPatch, QueryRecord, SortMode};
use serde_json::Value;

use crate::{AppAction, AppEvent, ChatLog, ConnectionState, Feed, Pane};

/// Application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies; fully testable in simulation.
#[derive(Debug, Clone)]
pub struct App {
    /// Chat connection state.
    connection: ConnectionState,
    /// Posts feed with filters and derived view.
    feed: Feed,
    /// Chat message view.
    chat: ChatLog,
    /// Console history mirror, newest first.
    history: Vec<QueryRecord>,
    /// Focused pane.
    pane: Pane,
    /// Page size used when (re)fetching the feed.
    page_limit: u32,
    /// Transient status message. `None` if no message.
    status_message: Option<String>,
    /// Terminal dimensions (columns, rows).
    terminal_size: (u16, u16),
}

impl App {
    /// Create a new App fetching pages of `page_limit` posts.
    pub fn new(page_limit: u32) -> Self {
        Self {
            connection: ConnectionState::Disconnected,
            feed: Feed::new(),
            chat: ChatLog::new(),
            history: Vec::new(),
            pane: Pane::default(),
            page_limit,
            status_message: None,
            terminal_size: (80, 24),
        }
    }

    /// Initial actions on startup: load the feed and open the chat.
    pub fn bootstrap(&mut self) -> Vec<AppAction> {
        self.status_message = Some("Loading posts...".to_string());
        vec![
            AppAction::FetchPosts { limit: self.page_limit, skip: 0 },
            AppAction::ConnectChat,
            AppAction::Render,
        ]
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Tick => vec![],
            AppEvent::Resize(cols, rows) => {
                self.terminal_size = (cols, rows);
                vec![AppAction::Render]
            },
            AppEvent::PostsLoaded(page) => {
                self.feed.set_page(page);
                self.status_message =
                    Some(format!("Loaded {} of {} posts", self.feed.posts().len(), self.feed.total()));
                vec![AppAction::Render]
            },
            AppEvent::PostCreated(post) => {
                self.status_message = Some(format!("Created post #{}", post.id));
                self.feed.insert_post(post);
                vec![AppAction::Render]
            },
            AppEvent::PostUpdated(post) => {
                self.status_message = Some(format!("Updated post #{}", post.id));
                self.feed.replace_post(post);
                vec![AppAction::Render]
            },
            AppEvent::PostDeleted { id } => {
                self.status_message = Some(format!("Deleted post #{id}"));
                self.feed.remove_post(id);
                vec![AppAction::Render]
            },
            AppEvent::ChatConnecting => {
                self.connection = ConnectionState::Connecting;
                vec![AppAction::Render]
            },
            AppEvent::ChatOpened => {
                self.connection = ConnectionState::Open;
                self.status_message = Some("Chat connected".to_string());
                vec![AppAction::Render]
            },
            AppEvent::ChatClosed => {
                self.connection = ConnectionState::Closed;
                self.status_message = Some("Chat disconnected".to_string());
                vec![AppAction::Render]
            },
            AppEvent::ChatMessageAppended(message) => {
                self.chat.push(message);
                if self.pane != Pane::Chat {
                    self.chat.set_unread(true);
                }
                vec![AppAction::Render]
            },
            AppEvent::QueryFinished(record) => {
                self.history.insert(0, record);
                self.history.truncate(DEFAULT_HISTORY_CAPACITY);
                vec![AppAction::Render]
            },
            AppEvent::Error { message } => {
                self.status_message = Some(format!("Error: {message}"));
                vec![AppAction::Render]
            },
        }
    }

    /// Refetch the first page of the feed.
    pub fn refresh(&mut self) -> Vec<AppAction> {
        self.status_message = Some("Refreshing feed...".to_string());
        vec![AppAction::FetchPosts { limit: self.page_limit, skip: 0 }, AppAction::Render]
    }

    /// Open (or reopen) the chat connection.
    pub fn connect_chat(&mut self) -> Vec<AppAction> {
        vec![AppAction::ConnectChat, AppAction::Render]
    }

    /// Send a chat message.
    pub fn send_chat(&self, text: impl Into<String>) -> Vec<AppAction> {
        vec![AppAction::SendChat { text: text.into() }, AppAction::Render]
    }

    /// Create a post.
    pub fn create_post(&mut self, post: NewPost) -> Vec<AppAction> {
        self.status_message = Some("Creating post...".to_string());
        vec![AppAction::CreatePost(post), AppAction::Render]
    }

    /// Partially update a post.
    pub fn update_post(&mut self, id: u64, patch: PostPatch) -> Vec<AppAction> {
        self.status_message = Some(format!("Updating post #{id}..."));
        vec![AppAction::UpdatePost { id, patch }, AppAction::Render]
    }

    /// Delete a post.
    pub fn delete_post(&mut self, id: u64) -> Vec<AppAction> {
        self.status_message = Some(format!("Deleting post #{id}..."));
        vec![AppAction::DeletePost { id }, AppAction::Render]
    }

    /// Execute a console query.
    pub fn run_query(&mut self, query: impl Into<String>, variables: Option<Value>) -> Vec<AppAction> {
        self.status_message = Some("Running query...".to_string());
        vec![AppAction::RunQuery { query: query.into(), variables }, AppAction::Render]
    }

    /// Quit the application.
    pub fn quit(&self) -> Vec<AppAction> {
        vec![AppAction::Quit]
    }

    /// Replace the feed search term.
    pub fn set_search_term(&mut self, term: impl Into<String>) -> Vec<AppAction> {
        self.feed.set_search_term(term);
        vec![AppAction::Render]
    }

    /// Toggle a feed category.
    pub fn toggle_category(&mut self, category: &str) -> Vec<AppAction> {
        self.feed.toggle_category(category);
        vec![AppAction::Render]
    }

    /// Replace the feed sort mode.
    pub fn set_sort_mode(&mut self, mode: SortMode) -> Vec<AppAction> {
        self.feed.set_sort_mode(mode);
        vec![AppAction::Render]
    }

    /// Advance the feed sort mode.
    pub fn cycle_sort_mode(&mut self) -> Vec<AppAction> {
        self.feed.cycle_sort_mode();
        vec![AppAction::Render]
    }

    /// Reset all feed filters.
    pub fn clear_filters(&mut self) -> Vec<AppAction> {
        self.feed.clear_filters();
        self.status_message = Some("Filters cleared".to_string());
        vec![AppAction::Render]
    }

    /// Focus a pane. Focusing the chat clears its unread marker.
    pub fn set_pane(&mut self, pane: Pane) -> Vec<AppAction> {
        self.pane = pane;
        if pane == Pane::Chat {
            self.chat.set_unread(false);
        }
        vec![AppAction::Render]
    }

    /// Focus the next pane.
    pub fn next_pane(&mut self) -> Vec<AppAction> {
        self.set_pane(self.pane.next())
    }

    /// Set a status message to display to the user.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Current chat connection state.
    pub fn connection_state(&self) -> ConnectionState {
        self.connection
    }

    /// The posts feed.
    pub fn feed(&self) -> &Feed {
        &self.feed
    }

    /// The chat view.
    pub fn chat(&self) -> &ChatLog {
        &self.chat
    }

    /// Console history, newest first.
    pub fn history(&self) -> &[QueryRecord] {
        &self.history
    }

    /// Focused pane.
    pub fn pane(&self) -> Pane {
        self.pane
    }

    /// Page size used when fetching the feed.
    pub fn page_limit(&self) -> u32 {
        self.page_limit
    }

    /// Transient status message. `None` if no message.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// Terminal dimensions (columns, rows).
    pub fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }
}
