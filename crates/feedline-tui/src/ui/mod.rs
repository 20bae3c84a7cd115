//! UI rendering.
//!
//! Rendering functions that convert App state into terminal output using
//! ratatui widgets. All functions are pure (no I/O), taking state and
//! drawing into the frame.

mod chat;
mod console;
mod feed;
mod filters;
mod input;
mod status;

use feedline_app::{App, Pane};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
};

use crate::InputState;

/// Render the entire UI.
pub fn render(frame: &mut Frame, app: &App, input_state: &InputState) {
    const MAIN_AREA_MIN_HEIGHT: u16 = 3;
    const INPUT_HEIGHT: u16 = 3;
    const STATUS_HEIGHT: u16 = 1;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(MAIN_AREA_MIN_HEIGHT),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(frame.area());

    let [main_area, input_area, status_area] = chunks.as_ref() else {
        return;
    };

    render_main_area(frame, app, *main_area);
    input::render(frame, app, input_state, *input_area);
    status::render(frame, app, *status_area);
}

/// Render the focused pane's main area.
fn render_main_area(frame: &mut Frame, app: &App, area: Rect) {
    match app.pane() {
        Pane::Feed => render_feed_area(frame, app, area),
        Pane::Chat => chat::render(frame, app, area),
        Pane::Console => console::render(frame, app, area),
    }
}

/// Feed pane: filters sidebar + post list.
fn render_feed_area(frame: &mut Frame, app: &App, area: Rect) {
    const FILTER_SIDEBAR_WIDTH: u16 = 28;
    const FEED_AREA_MIN_WIDTH: u16 = 20;

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(FILTER_SIDEBAR_WIDTH), Constraint::Min(FEED_AREA_MIN_WIDTH)])
        .split(area);

    let [filters_area, feed_area] = chunks.as_ref() else {
        return;
    };

    filters::render(frame, app, *filters_area);
    feed::render(frame, app, *feed_area);
}
