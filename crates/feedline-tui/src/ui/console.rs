//! Query console area.
//!
//! Displays the history of executed queries, newest first.

use feedline_core::QueryOutcome;
use feedline_app::App;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

const BORDER_SIZE: u16 = 2;

/// Render the console area.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Query History ({}) ", app.history().len()));

    let items: Vec<ListItem> = if app.history().is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            "Type a query, optionally `| {\"variables\": ...}`",
            Style::default().fg(Color::DarkGray),
        )))]
    } else {
        app.history()
            .iter()
            .map(|record| {
                let (mark, style) = match &record.outcome {
                    QueryOutcome::Success { .. } => ("ok ", Style::default().fg(Color::Green)),
                    QueryOutcome::Error { .. } => ("err", Style::default().fg(Color::Red)),
                };

                let first_line = record.query.lines().next().unwrap_or_default().to_string();

                ListItem::new(Line::from(vec![
                    Span::styled(mark, style),
                    Span::raw(" "),
                    Span::raw(first_line),
                    Span::styled(
                        format!("  {}ms", record.duration_ms),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]))
            })
            .collect()
    };

    let visible_height = area.height.saturating_sub(BORDER_SIZE) as usize;
    let visible_items: Vec<_> = items.into_iter().take(visible_height.max(1)).collect();

    let list = List::new(visible_items).block(block);

    frame.render_widget(list, area);
}
