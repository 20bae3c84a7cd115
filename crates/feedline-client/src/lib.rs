//! I/O clients for Feedline.
//!
//! Thin layers over the network: a REST client for the posts API, the
//! query console's dispatch onto it, and the WebSocket chat transport.
//! Protocol and state logic stay in the sans-IO `feedline-core` types;
//! this crate just moves bytes and reports what happened.

#![forbid(unsafe_code)]

pub mod chat;
pub mod env;
pub mod error;
pub mod graphql;
pub mod http;
pub mod posts;

pub use chat::{ChatConfig, ChatEvent, ChatHandle};
pub use env::SystemEnv;
pub use error::ApiError;
pub use graphql::GraphqlClient;
pub use http::{DEFAULT_API_BASE_URL, RestClient};
pub use posts::PostsApi;
