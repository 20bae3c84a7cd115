//! Input state and key handling for the TUI.
//!
//! This module owns all text input state (buffer, cursor) and handles
//! character-level key events. Command parsing happens here on Enter; what
//! plain text means depends on the focused pane.

use feedline_app::{App, AppAction, Pane};

use crate::commands::{self, Command};

/// Key input events from the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Character input.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Backspace key.
    Backspace,
    /// Delete key.
    Delete,
    /// Tab key.
    Tab,
    /// Escape key.
    Esc,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Home key.
    Home,
    /// End key.
    End,
}

/// Input state for the TUI.
///
/// Manages the text input buffer and cursor position.
#[derive(Debug, Default)]
pub struct InputState {
    /// Text buffer for user input.
    buffer: String,
    /// Cursor position within the buffer.
    cursor: usize,
}

impl InputState {
    /// Create a new empty input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text in the input buffer.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Current cursor position.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Handle a key input event.
    ///
    /// Returns actions to process (may be empty for input-only keys).
    pub fn handle_key(&mut self, key: KeyInput, app: &mut App) -> Vec<AppAction> {
        match key {
            KeyInput::Char(c) => {
                self.buffer.insert(self.cursor, c);
                self.cursor = self.cursor.saturating_add(c.len_utf8());
                vec![AppAction::Render]
            },
            KeyInput::Backspace => {
                if self.cursor > 0 {
                    let previous = floor_char_boundary(&self.buffer, self.cursor - 1);
                    self.buffer.remove(previous);
                    self.cursor = previous;
                }
                vec![AppAction::Render]
            },
            KeyInput::Delete => {
                if self.cursor < self.buffer.len() {
                    self.buffer.remove(self.cursor);
                }
                vec![AppAction::Render]
            },
            KeyInput::Left => {
                if self.cursor > 0 {
                    self.cursor = floor_char_boundary(&self.buffer, self.cursor - 1);
                }
                vec![AppAction::Render]
            },
            KeyInput::Right => {
                if self.cursor < self.buffer.len() {
                    self.cursor = ceil_char_boundary(&self.buffer, self.cursor + 1);
                }
                vec![AppAction::Render]
            },
            KeyInput::Home => {
                self.cursor = 0;
                vec![AppAction::Render]
            },
            KeyInput::End => {
                self.cursor = self.buffer.len();
                vec![AppAction::Render]
            },
            KeyInput::Enter => self.handle_enter(app),
            KeyInput::Tab => app.next_pane(),
            KeyInput::Esc => vec![AppAction::Quit],
            KeyInput::Up | KeyInput::Down => vec![],
        }
    }

    /// Handle Enter: parse the line and call the App API.
    fn handle_enter(&mut self, app: &mut App) -> Vec<AppAction> {
        let text = std::mem::take(&mut self.buffer);
        self.cursor = 0;

        if text.trim().is_empty() {
            return vec![];
        }

        match commands::parse(&text) {
            Command::Sort { mode } => app.set_sort_mode(mode),
            Command::Category { name } => app.toggle_category(&name),
            Command::ClearFilters => app.clear_filters(),
            Command::Refresh => app.refresh(),
            Command::New { post } => app.create_post(post),
            Command::Edit { id, patch } => app.update_post(id, patch),
            Command::Delete { id } => app.delete_post(id),
            Command::Connect => app.connect_chat(),
            Command::Quit => app.quit(),
            Command::Message { content } => Self::handle_plain_text(app, content),
            Command::Unknown { input } => {
                app.set_status(format!("Unknown command: {input}"));
                vec![AppAction::Render]
            },
            Command::InvalidArgs { command, error } => {
                app.set_status(format!("/{command}: {error}"));
                vec![AppAction::Render]
            },
        }
    }

    /// Plain text: search term, chat message, or console query by pane.
    fn handle_plain_text(app: &mut App, content: String) -> Vec<AppAction> {
        match app.pane() {
            Pane::Feed => app.set_search_term(content),
            Pane::Chat => app.send_chat(content),
            Pane::Console => {
                // `query | {"vars": ...}` syntax; malformed variables are
                // an inline error, never a crash.
                let (query, variables) = match content.split_once('|') {
                    Some((query, raw_vars)) if !raw_vars.trim().is_empty() => {
                        match serde_json::from_str(raw_vars.trim()) {
                            Ok(value) => (query.trim().to_string(), Some(value)),
                            Err(_) => {
                                app.set_status("Invalid JSON in variables");
                                return vec![AppAction::Render];
                            },
                        }
                    },
                    Some((query, _)) => (query.trim().to_string(), None),
                    None => (content, None),
                };
                app.run_query(query, variables)
            },
        }
    }
}

/// Largest char boundary at or below `index`.
fn floor_char_boundary(s: &str, index: usize) -> usize {
    let mut index = index.min(s.len());
    while index > 0 && !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Smallest char boundary at or above `index`.
fn ceil_char_boundary(s: &str, index: usize) -> usize {
    let mut index = index.min(s.len());
    while index < s.len() && !s.is_char_boundary(index) {
        index += 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use feedline_app::Pane;

    use super::*;

    fn type_line(input: &mut InputState, app: &mut App, text: &str) -> Vec<AppAction> {
        for c in text.chars() {
            let _ = input.handle_key(KeyInput::Char(c), app);
        }
        input.handle_key(KeyInput::Enter, app)
    }

    #[test]
    fn char_input_adds_to_buffer() {
        let mut input = InputState::new();
        let mut app = App::new(50);

        let _ = input.handle_key(KeyInput::Char('h'), &mut app);
        let _ = input.handle_key(KeyInput::Char('i'), &mut app);

        assert_eq!(input.buffer(), "hi");
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn backspace_removes_char() {
        let mut input = InputState::new();
        let mut app = App::new(50);

        let _ = input.handle_key(KeyInput::Char('a'), &mut app);
        let _ = input.handle_key(KeyInput::Char('b'), &mut app);
        let _ = input.handle_key(KeyInput::Backspace, &mut app);

        assert_eq!(input.buffer(), "a");
        assert_eq!(input.cursor(), 1);
    }

    #[test]
    fn enter_on_feed_pane_sets_search() {
        let mut input = InputState::new();
        let mut app = App::new(50);

        let _ = type_line(&mut input, &mut app, "mystery");

        assert!(input.buffer().is_empty());
        assert_eq!(app.feed().filters().search_term(), "mystery");
    }

    #[test]
    fn enter_on_chat_pane_sends_message() {
        let mut input = InputState::new();
        let mut app = App::new(50);
        let _ = app.set_pane(Pane::Chat);

        let actions = type_line(&mut input, &mut app, "hello");
        assert!(actions.iter().any(|a| matches!(a, AppAction::SendChat { text } if text == "hello")));
    }

    #[test]
    fn console_rejects_malformed_variables_inline() {
        let mut input = InputState::new();
        let mut app = App::new(50);
        let _ = app.set_pane(Pane::Console);

        let actions = type_line(&mut input, &mut app, "{ posts { total } } | {not json");
        assert_eq!(actions, vec![AppAction::Render]);
        assert_eq!(app.status_message(), Some("Invalid JSON in variables"));
    }

    #[test]
    fn console_passes_query_and_variables() {
        let mut input = InputState::new();
        let mut app = App::new(50);
        let _ = app.set_pane(Pane::Console);

        let actions = type_line(&mut input, &mut app, r#"{ posts { total } } | {"limit": 3}"#);
        assert!(actions.iter().any(|a| matches!(
            a,
            AppAction::RunQuery { variables: Some(vars), .. } if vars["limit"] == 3
        )));
    }

    #[test]
    fn tab_cycles_panes() {
        let mut input = InputState::new();
        let mut app = App::new(50);
        assert_eq!(app.pane(), Pane::Feed);

        let _ = input.handle_key(KeyInput::Tab, &mut app);
        assert_eq!(app.pane(), Pane::Chat);

        let _ = input.handle_key(KeyInput::Tab, &mut app);
        assert_eq!(app.pane(), Pane::Console);

        let _ = input.handle_key(KeyInput::Tab, &mut app);
        assert_eq!(app.pane(), Pane::Feed);
    }

    #[test]
    fn slash_commands_drive_filters() {
        let mut input = InputState::new();
        let mut app = App::new(50);

        let _ = type_line(&mut input, &mut app, "/cat fiction");
        assert_eq!(app.feed().filters().selected_categories(), &["fiction"]);

        let _ = type_line(&mut input, &mut app, "/clear");
        assert!(app.feed().filters().selected_categories().is_empty());
    }
}
