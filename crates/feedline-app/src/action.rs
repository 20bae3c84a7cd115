//! Application side-effects and intents.
//!
//! Instructions produced by the [`crate::App`] state machine for the
//! runtime to execute.

use feedline_core::{NewPost, PostPatch};
use serde_json::Value;

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,

    /// Start fetching a page of posts.
    FetchPosts {
        /// Page size.
        limit: u32,
        /// Offset into the collection.
        skip: u32,
    },

    /// Start creating a post.
    CreatePost(NewPost),

    /// Start partially updating a post.
    UpdatePost {
        /// Post to update.
        id: u64,
        /// Fields to change.
        patch: PostPatch,
    },

    /// Start deleting a post.
    DeletePost {
        /// Post to delete.
        id: u64,
    },

    /// Open the chat connection.
    ConnectChat,

    /// Send a chat message.
    SendChat {
        /// Message text.
        text: String,
    },

    /// Execute a console query.
    RunQuery {
        /// Query text.
        query: String,
        /// Optional JSON variables.
        variables: Option<Value>,
    },
}
