//! Top header bar showing the page title and the open file.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::i18n;
use crate::tui::app::App;

/// Render the top header bar.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let mut spans = vec![
        Span::styled(format!(" {}", i18n::app_name()), theme.header_bar),
        Span::styled(format!(" | {}", i18n::page_title()), theme.header_bar),
    ];

    if let Some(path) = &app.current_path {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        spans.push(Span::styled(format!(" | {file_name}"), theme.header_bar));
    }

    if !app.modals.0.is_empty() {
        let depth = app.modals.0.len();
        spans.push(Span::styled(format!(" | +{depth}"), theme.header_bar));
    }

    // Right-aligned help hint
    let left_len: usize = spans.iter().map(|s| s.content.width()).sum();
    let right_text = format!(" [?]{}", i18n::tui_help_title());
    let padding = (area.width as usize).saturating_sub(left_len + right_text.width());
    if padding > 0 {
        spans.push(Span::styled(" ".repeat(padding), theme.header_bar));
    }
    spans.push(Span::styled(right_text, theme.header_bar));

    let bar = Paragraph::new(Line::from(spans)).style(theme.header_bar);
    frame.render_widget(bar, area);
}
