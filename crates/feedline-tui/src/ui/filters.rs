//! Filters sidebar.
//!
//! Shows the search term, category checkboxes, and the sort mode.

use feedline_app::App;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Categories offered by the sidebar (`/cat <name>` toggles one).
pub const CATEGORY_OPTIONS: [&str; 10] = [
    "history", "fiction", "crime", "french", "english", "magical", "mystery", "love", "classic",
    "american",
];

/// Render the filters sidebar.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let filters = app.feed().filters();

    let mut lines = Vec::new();

    let search = if filters.search_term().trim().is_empty() {
        Span::styled("(none)", Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(
            format!("\"{}\"", filters.search_term()),
            Style::default().fg(Color::Yellow),
        )
    };
    lines.push(Line::from(vec![Span::raw("Search: "), search]));

    lines.push(Line::from(vec![
        Span::raw("Sort: "),
        Span::styled(filters.sort_mode().to_string(), Style::default().fg(Color::Magenta)),
    ]));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Categories",
        Style::default().add_modifier(Modifier::BOLD),
    )));

    for category in CATEGORY_OPTIONS {
        let selected = filters.selected_categories().iter().any(|c| c == category);
        let (mark, style) = if selected {
            ("[x] ", Style::default().fg(Color::Blue))
        } else {
            ("[ ] ", Style::default())
        };
        lines.push(Line::from(vec![Span::raw(mark), Span::styled(category, style)]));
    }

    if app.feed().has_active_filters() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "/clear resets filters",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let block = Block::default().borders(Borders::ALL).title(" Filters ");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
