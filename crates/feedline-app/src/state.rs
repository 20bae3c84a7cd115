//! Observable application state types.
//!
//! These structures are the view model for the application: the subset of
//! domain state a frontend needs for rendering, kept up to date by the
//! [`crate::App`] state machine as events arrive.

use feedline_core::{ChatMessage, FEED_CAP, FilterState, Post, PostsPage, SortMode};

/// Chat connection state as observed by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No connection has been requested yet.
    Disconnected,
    /// Connection attempt in progress.
    Connecting,
    /// Connected; sends will be transmitted.
    Open,
    /// The connection ended.
    Closed,
}

/// Which pane currently has focus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Pane {
    /// Posts feed with filters.
    #[default]
    Feed,
    /// Echo chat.
    Chat,
    /// Query console with history.
    Console,
}

impl Pane {
    /// Cycle to the next pane.
    pub fn next(self) -> Self {
        match self {
            Pane::Feed => Pane::Chat,
            Pane::Chat => Pane::Console,
            Pane::Console => Pane::Feed,
        }
    }
}

/// The posts feed: a bounded page plus filters and the derived view.
///
/// The visible view is plain cached state, explicitly recomputed whenever
/// the page or the filters change. Rendering reads it without recomputing.
#[derive(Debug, Clone, Default)]
pub struct Feed {
    posts: Vec<Post>,
    total: u64,
    filters: FilterState,
    visible: Vec<Post>,
}

impl Feed {
    /// Create an empty feed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the feed with a freshly fetched page, capped to
    /// [`FEED_CAP`] posts.
    pub fn set_page(&mut self, page: PostsPage) {
        self.total = page.total;
        self.posts = page.posts;
        self.posts.truncate(FEED_CAP);
        self.recompute();
    }

    /// The held page, before filtering.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Server-side total across all pages.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// The derived, display-ordered view.
    pub fn visible(&self) -> &[Post] {
        &self.visible
    }

    /// Current filter state.
    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// True iff any filter diverges from the defaults.
    pub fn has_active_filters(&self) -> bool {
        self.filters.has_active_filters()
    }

    /// Replace the search term.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.filters.set_search_term(term);
        self.recompute();
    }

    /// Toggle a category in the selection.
    pub fn toggle_category(&mut self, category: &str) {
        self.filters.toggle_category(category);
        self.recompute();
    }

    /// Remove a category from the selection.
    pub fn remove_category(&mut self, category: &str) {
        self.filters.remove_category(category);
        self.recompute();
    }

    /// Replace the sort mode.
    pub fn set_sort_mode(&mut self, mode: SortMode) {
        self.filters.set_sort_mode(mode);
        self.recompute();
    }

    /// Advance to the next sort mode in sidebar order.
    pub fn cycle_sort_mode(&mut self) {
        let current = self.filters.sort_mode();
        let index = SortMode::ALL.iter().position(|mode| *mode == current).unwrap_or(0);
        let next = SortMode::ALL[(index + 1) % SortMode::ALL.len()];
        self.filters.set_sort_mode(next);
        self.recompute();
    }

    /// Reset all filters to the defaults.
    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.recompute();
    }

    /// Insert a new post at the top of the page (the feed stays capped).
    pub fn insert_post(&mut self, post: Post) {
        self.posts.insert(0, post);
        self.posts.truncate(FEED_CAP);
        self.total = self.total.saturating_add(1);
        self.recompute();
    }

    /// Replace a post in place, matched by id. Unknown ids are ignored.
    pub fn replace_post(&mut self, post: Post) {
        if let Some(existing) = self.posts.iter_mut().find(|p| p.id == post.id) {
            *existing = post;
            self.recompute();
        }
    }

    /// Remove a post by id. Unknown ids are ignored.
    pub fn remove_post(&mut self, id: u64) {
        let before = self.posts.len();
        self.posts.retain(|post| post.id != id);
        if self.posts.len() != before {
            self.total = self.total.saturating_sub(1);
            self.recompute();
        }
    }

    fn recompute(&mut self) {
        self.visible = self.filters.apply(&self.posts);
    }
}

/// The chat view: messages in arrival order plus an unread marker.
#[derive(Debug, Clone, Default)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
    unread: bool,
}

impl ChatLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages in append order.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Append a message.
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Whether messages arrived while the chat pane was not focused.
    pub fn unread(&self) -> bool {
        self.unread
    }

    /// Set or clear the unread marker.
    pub fn set_unread(&mut self, unread: bool) {
        self.unread = unread;
    }
}
