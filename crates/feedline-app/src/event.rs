//! Application input events.
//!
//! Events originate from two sources: user/system input surfaced by the
//! driver (ticks, resizes) and completions of I/O the runtime started
//! earlier (loaded pages, chat traffic, finished queries).

use feedline_core::{ChatMessage, Post, PostsPage, QueryRecord};

/// Events processed by the App state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Periodic tick.
    Tick,

    /// Terminal resize (columns, rows).
    Resize(u16, u16),

    /// A page of posts finished loading.
    PostsLoaded(PostsPage),

    /// A post was created server-side.
    PostCreated(Post),

    /// A post was updated server-side.
    PostUpdated(Post),

    /// A post was deleted server-side.
    PostDeleted {
        /// Id of the deleted post.
        id: u64,
    },

    /// Chat connection attempt started.
    ChatConnecting,

    /// Chat connection opened.
    ChatOpened,

    /// Chat connection closed.
    ChatClosed,

    /// A message became visible in the chat (own send or foreign
    /// traffic; echoes of own sends are reconciled away before this).
    ChatMessageAppended(ChatMessage),

    /// A console query finished executing, successfully or not.
    QueryFinished(QueryRecord),

    /// Something failed; `message` is human-readable.
    Error {
        /// Error description.
        message: String,
    },
}
