//! Status bar.
//!
//! Displays pane tabs, chat connection state, and the transient status
//! message.

use feedline_app::{App, ConnectionState, Pane};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

/// Render the status bar.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::raw(" ")];

    for (pane, label) in
        [(Pane::Feed, "Feed"), (Pane::Chat, "Chat"), (Pane::Console, "Console")]
    {
        let mut label = label.to_string();
        if pane == Pane::Chat && app.chat().unread() {
            label.push('*');
        }

        let style = if app.pane() == pane {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!("[{label}] "), style));
    }

    let connection = match app.connection_state() {
        ConnectionState::Disconnected => {
            Span::styled("chat: off", Style::default().fg(Color::DarkGray))
        },
        ConnectionState::Connecting => {
            Span::styled("chat: connecting...", Style::default().fg(Color::Yellow))
        },
        ConnectionState::Open => Span::styled(
            "chat: connected",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        ConnectionState::Closed => {
            Span::styled("chat: disconnected", Style::default().fg(Color::Red))
        },
    };
    spans.push(connection);

    if let Some(message) = app.status_message() {
        spans.push(Span::styled(
            format!(" | {message}"),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(paragraph, area);
}
