//! Application layer for Feedline.
//!
//! Pure state machines and a generic runtime for UI and protocol
//! orchestration, enabling deterministic simulation testing with the same
//! code that runs in production.
//!
//! # Components
//!
//! - [`App`]: UI state machine (feed, chat view, console history, panes)
//! - [`Bridge`]: wraps the chat session, translating transport events to
//!   app events and app intents to outgoing messages
//! - [`Driver`]: trait for platform-specific I/O abstraction
//! - [`Runtime`]: generic orchestration loop using Driver

#![forbid(unsafe_code)]

mod action;
mod app;
mod bridge;
mod driver;
mod event;
mod runtime;
mod state;

pub use action::AppAction;
pub use app::App;
pub use bridge::Bridge;
pub use driver::Driver;
pub use event::AppEvent;
pub use runtime::Runtime;
pub use state::{ChatLog, ConnectionState, Feed, Pane};
