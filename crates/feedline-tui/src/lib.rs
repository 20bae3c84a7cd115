//! Terminal frontend for Feedline.
//!
//! Implements the [`feedline_app::Driver`] seam over crossterm events,
//! ratatui rendering, reqwest-backed posts calls, and the WebSocket chat
//! transport. All interactive state beyond the raw input line lives in
//! the shared [`feedline_app::App`].

#![forbid(unsafe_code)]

pub mod commands;
pub mod input;
pub mod terminal;
pub mod ui;

pub use input::{InputState, KeyInput};
pub use terminal::{TerminalDriver, TerminalError};
