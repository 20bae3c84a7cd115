//! Chat area.
//!
//! Displays the visible chat messages.

use feedline_app::App;
use feedline_core::MessageKind;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

const BORDER_SIZE: u16 = 2;

/// Render the chat area.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Chat ");

    let items: Vec<ListItem> = if app.chat().messages().is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            "No messages yet",
            Style::default().fg(Color::DarkGray),
        )))]
    } else {
        app.chat()
            .messages()
            .iter()
            .map(|message| {
                let line = match message.kind {
                    MessageKind::Message => Line::from(vec![
                        Span::styled(
                            format!("<{}>", message.username),
                            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                        ),
                        Span::raw(" "),
                        Span::raw(message.text.clone()),
                    ]),
                    MessageKind::System | MessageKind::Join | MessageKind::Leave => {
                        Line::from(Span::styled(
                            format!("* {}", message.text),
                            Style::default().fg(Color::DarkGray),
                        ))
                    },
                };
                ListItem::new(line)
            })
            .collect()
    };

    let visible_height = area.height.saturating_sub(BORDER_SIZE) as usize;
    let skip = items.len().saturating_sub(visible_height);
    let visible_items: Vec<_> = items.into_iter().skip(skip).collect();

    let list = List::new(visible_items).block(block);

    frame.render_widget(list, area);
}
