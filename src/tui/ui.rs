//! Main render function that dispatches to widgets.

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Frame;

use super::app::App;
use super::widgets;
use crate::i18n;

/// Height of the drop zone above a loaded message.
const COMPACT_DROP_HEIGHT: u16 = 3;

/// Render the entire TUI frame.
pub fn render(frame: &mut Frame, app: &mut App) {
    let size = frame.area();

    // Vertical layout: header (1) + content (flex) + status (1)
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(size);

    widgets::header_bar::render(frame, app, vertical[0]);

    // The viewer only appears once a file has been read
    if app.page.viewer().is_some() {
        let split = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(COMPACT_DROP_HEIGHT),
                Constraint::Min(3),
            ])
            .split(vertical[1]);
        widgets::drop_zone::render(frame, app, split[0], true);
        if let Some(viewer) = app.page.viewer() {
            widgets::message_view::render(
                frame,
                viewer,
                &mut app.root_pane,
                split[1],
                &app.theme,
                i18n::page_title(),
            );
        }
    } else {
        widgets::drop_zone::render(frame, app, vertical[1], false);
    }

    widgets::status_bar::render(frame, app, vertical[2]);

    // Modals, bottom of the stack first
    for (depth, modal) in app.modals.0.iter_mut().enumerate() {
        widgets::modal::render(frame, modal, depth, vertical[1], &app.theme);
    }

    if app.show_help {
        widgets::help_popup::render(frame, app);
    }
    widgets::path_prompt::render(frame, app);
}
