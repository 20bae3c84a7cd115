//! Post feed area.
//!
//! Displays the filtered, sorted view of the fetched page.

use feedline_app::App;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

const BORDER_SIZE: u16 = 2;

/// Render the feed area.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let title = if app.feed().has_active_filters() {
        format!(" Posts ({} of {}) ", app.feed().visible().len(), app.feed().posts().len())
    } else {
        format!(" Posts ({}) ", app.feed().posts().len())
    };

    let block = Block::default().borders(Borders::ALL).title(title);

    let items: Vec<ListItem> = if app.feed().visible().is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            "No posts match the current filters",
            Style::default().fg(Color::DarkGray),
        )))]
    } else {
        app.feed()
            .visible()
            .iter()
            .map(|post| {
                let tags = if post.tags.is_empty() {
                    String::new()
                } else {
                    format!("  [{}]", post.tags.join(", "))
                };

                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("#{:<4}", post.id),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(
                        post.title.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("  +{}", post.reactions.likes),
                        Style::default().fg(Color::Green),
                    ),
                    Span::styled(tags, Style::default().fg(Color::Cyan)),
                ]))
            })
            .collect()
    };

    let visible_height = area.height.saturating_sub(BORDER_SIZE) as usize;
    let skip = items.len().saturating_sub(visible_height);
    let visible_items: Vec<_> = items.into_iter().skip(skip).collect();

    let list = List::new(visible_items).block(block);

    frame.render_widget(list, area);
}
