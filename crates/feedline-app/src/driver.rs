//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the application runtime from specific
//! I/O implementations. Each frontend implements the trait to provide
//! platform-specific I/O, while the generic [`crate::Runtime`] handles all
//! orchestration.
//!
//! HTTP operations are deliberately fire-and-forget: `start_*` methods
//! spawn the work and return immediately, and the eventual result comes
//! back through [`Driver::poll_event`] as an app event. The event loop
//! therefore never blocks on a fetch, and there is no cancellation: a
//! result arriving after the caller stopped caring is simply absorbed.

use std::{future::Future, ops::Sub, time::Duration};

use feedline_client::ChatEvent;
use feedline_core::{ChatMessage, NewPost, PostPatch};
use serde_json::Value;

use crate::{App, AppAction};

/// Abstracts I/O operations for the application runtime.
///
/// # Implementations
///
/// - **TUI**: crossterm for terminal events, reqwest for HTTP, a
///   WebSocket task for chat
/// - **Simulation**: fully in-memory, deterministic
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Time instant type. Enables virtual time in simulation.
    type Instant: Copy + Ord + Send + Sync + Sub<Output = Duration>;

    /// Poll for the next input or completion event.
    ///
    /// Translates whatever arrived (key input, async results) into
    /// actions by way of the App, and returns them for the runtime to
    /// execute. Returns an empty vector when nothing happened.
    fn poll_event(
        &mut self,
        app: &mut App,
    ) -> impl Future<Output = Result<Vec<AppAction>, Self::Error>> + Send;

    /// Start fetching a page of posts.
    fn start_fetch_posts(&mut self, limit: u32, skip: u32);

    /// Start creating a post.
    fn start_create_post(&mut self, post: NewPost);

    /// Start partially updating a post.
    fn start_update_post(&mut self, id: u64, patch: PostPatch);

    /// Start deleting a post.
    fn start_delete_post(&mut self, id: u64);

    /// Start executing a console query.
    fn start_query(&mut self, query: String, variables: Option<Value>);

    /// Open the chat connection. Progress and traffic surface through
    /// [`Driver::recv_chat`].
    fn connect_chat(&mut self);

    /// Transmit a chat message over the open connection.
    fn send_chat(
        &mut self,
        message: ChatMessage,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Take the next already-available transport event, without waiting.
    ///
    /// `None` when nothing is pending (including when no connection
    /// exists).
    fn recv_chat(&mut self) -> impl Future<Output = Option<ChatEvent>> + Send;

    /// Render the application state.
    fn render(&mut self, app: &App) -> Result<(), Self::Error>;

    /// Current time instant.
    fn now(&self) -> Self::Instant;

    /// Stop connections and clean up resources.
    fn stop(&mut self);
}
