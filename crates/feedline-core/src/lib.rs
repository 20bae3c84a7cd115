//! Core domain logic for Feedline.
//!
//! Pure state machines and data types shared by every frontend: the post
//! query engine, the chat session state machine, the query console history,
//! and the tagged request type behind the simulated GraphQL façade.
//!
//! Nothing in this crate performs I/O. Time and randomness come in through
//! the [`Environment`] abstraction (or as plain method parameters), which
//! keeps every state machine deterministic and directly testable.

#![forbid(unsafe_code)]

pub mod chat;
pub mod env;
pub mod error;
pub mod graphql;
pub mod history;
pub mod post;
pub mod query;

pub use chat::{
    ChatMessage, ChatSession, MessageKind, ReceiveOutcome, ReconnectPolicy, SessionState,
};
pub use env::Environment;
pub use error::ChatError;
pub use graphql::{GraphqlParseError, GraphqlRequest};
pub use history::{DEFAULT_HISTORY_CAPACITY, QueryHistory, QueryOutcome, QueryRecord};
pub use post::{NewPost, Post, PostPatch, PostReactions, PostsPage};
pub use query::{FEED_CAP, FilterState, SortMode};
