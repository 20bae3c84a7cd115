//! Input line.

use feedline_app::{App, Pane};
use ratatui::{
    Frame,
    layout::Rect,
    widgets::{Block, Borders, Paragraph},
};

use crate::InputState;

/// Render the input line; the title reflects what Enter will do.
pub fn render(frame: &mut Frame, app: &App, input_state: &InputState, area: Rect) {
    let title = match app.pane() {
        Pane::Feed => " Search (or /command) ",
        Pane::Chat => " Message (or /command) ",
        Pane::Console => " Query ",
    };

    let block = Block::default().borders(Borders::ALL).title(title);
    let paragraph = Paragraph::new(format!("> {}", input_state.buffer())).block(block);

    frame.render_widget(paragraph, area);
}
