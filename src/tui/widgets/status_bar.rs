//! Bottom status bar showing transient messages or context-sensitive keyboard hints.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::i18n;
use crate::tui::app::{App, ModalContent};

/// Version string shown at the right edge of the status bar.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Render the status bar at the bottom with context-sensitive hints and version.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let version_text = format!("v{VERSION} ");
    let version_width = version_text.len() as u16;

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(version_width)])
        .split(area);

    let content = if let Some((msg, _)) = &app.status_message {
        Line::from(Span::styled(format!(" {msg}"), theme.status_bar))
    } else {
        let mut spans = Vec::new();
        for (i, (key, desc)) in build_hints(app).iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" ", theme.status_bar));
            }
            spans.push(Span::styled(format!(" {key}"), theme.key_hint));
            spans.push(Span::styled(format!(":{desc}"), theme.status_bar));
        }
        Line::from(spans)
    };

    frame.render_widget(Paragraph::new(content).style(theme.status_bar), chunks[0]);

    let version = Paragraph::new(Line::from(Span::styled(version_text, theme.border)))
        .alignment(Alignment::Right)
        .style(theme.status_bar);
    frame.render_widget(version, chunks[1]);
}

/// Return hint pairs (key, description) for what currently has the keyboard.
fn build_hints(app: &App) -> Vec<(&'static str, &'static str)> {
    if app.prompt.is_some() {
        return vec![
            ("Enter", i18n::tui_hint_submit()),
            ("Esc", i18n::tui_hint_cancel()),
        ];
    }
    if app.show_help {
        return vec![("Esc", i18n::tui_hint_close())];
    }

    let menu_open = app
        .modals
        .0
        .last()
        .map(|m| match &m.content {
            ModalContent::Message { pane, .. } => pane.menu.is_some(),
            ModalContent::Source { .. } => false,
        })
        .unwrap_or(app.root_pane.menu.is_some());
    if menu_open {
        return vec![
            ("j/k", i18n::tui_hint_actions()),
            ("Enter", i18n::tui_hint_submit()),
            ("Esc", i18n::tui_hint_close_menu()),
        ];
    }

    if let Some(modal) = app.modals.0.last() {
        if let ModalContent::Source { .. } = modal.content {
            return vec![
                ("j/k", i18n::tui_hint_scroll()),
                ("g", i18n::tui_hint_top()),
                ("Esc", i18n::tui_hint_close()),
            ];
        }
    }

    let mut hints = Vec::new();
    if app.active_viewer().is_some() {
        hints.push(("j/k", i18n::tui_hint_scroll()));
        if app.attachment_count() > 0 {
            hints.push(("Tab", i18n::tui_hint_attach()));
            hints.push(("Enter", i18n::tui_hint_actions()));
            hints.push(("d", i18n::tui_hint_download()));
            hints.push(("v", i18n::tui_hint_view()));
        }
        hints.push(("s", i18n::tui_hint_source()));
    }
    if app.modals.0.is_empty() {
        hints.push(("o", i18n::tui_hint_open()));
    } else {
        hints.push(("Esc", i18n::tui_hint_close()));
    }
    hints.push(("?", i18n::tui_hint_help()));
    hints.push(("q", i18n::tui_hint_quit()));
    hints
}
