//! Help popup showing keyboard shortcuts in multi-column layout.

use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use super::centered_rect_exact;
use crate::i18n;
use crate::tui::app::App;
use crate::tui::theme::Theme;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// A single shortcut entry.
struct Shortcut {
    key: &'static str,
    desc: &'static str,
}

/// Render the help popup centered on screen with multi-column shortcuts.
pub fn render(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let screen = frame.area();

    let popup_width = (screen.width * 78 / 100).min(screen.width.saturating_sub(4));
    let inner_width = popup_width.saturating_sub(2) as usize;

    let cols = if inner_width >= 90 {
        3
    } else if inner_width >= 56 {
        2
    } else {
        1
    };
    let col_width = inner_width / cols;

    let lines = build_lines(cols, col_width, inner_width.saturating_sub(2), theme);

    let content_height = lines.len() as u16 + 1;
    let popup_height = (content_height + 2).min(screen.height.saturating_sub(2));
    let area = centered_rect_exact(popup_width, popup_height, screen);

    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.popup_title)
        .title(i18n::tui_help_title())
        .style(theme.popup);

    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Paragraph::new(lines), inner);
}

/// Build all the help content lines.
fn build_lines(cols: usize, col_width: usize, sep_width: usize, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();

    lines.push(Line::from(vec![
        Span::styled(format!("  {}", i18n::app_name()), theme.popup_title),
        Span::styled(format!("  v{VERSION}"), theme.dim),
    ]));
    lines.push(Line::from(Span::styled(
        format!("  {}", i18n::tui_help_description()),
        theme.dim,
    )));

    section(&mut lines, i18n::tui_help_message(), sep_width, theme);
    add_shortcuts_columns(
        &mut lines,
        &[
            Shortcut { key: "j/k", desc: i18n::tui_hint_scroll() },
            Shortcut { key: "PgUp/Dn", desc: i18n::tui_hint_scroll() },
            Shortcut { key: "g", desc: i18n::tui_hint_top() },
            Shortcut { key: "s", desc: i18n::view_source() },
        ],
        cols,
        col_width,
        theme,
    );

    section(&mut lines, i18n::tui_attachments(), sep_width, theme);
    add_shortcuts_columns(
        &mut lines,
        &[
            Shortcut { key: "Tab/\u{2190}\u{2192}", desc: i18n::tui_hint_attach() },
            Shortcut { key: "Enter", desc: i18n::tui_hint_actions() },
            Shortcut { key: "d", desc: i18n::action_download() },
            Shortcut { key: "v", desc: i18n::action_view() },
        ],
        cols,
        col_width,
        theme,
    );

    section(&mut lines, i18n::tui_help_general(), sep_width, theme);
    add_shortcuts_columns(
        &mut lines,
        &[
            Shortcut { key: "o", desc: i18n::tui_hint_open() },
            Shortcut { key: "Esc", desc: i18n::tui_hint_close() },
            Shortcut { key: "?", desc: i18n::tui_hint_help() },
            Shortcut { key: "q", desc: i18n::tui_hint_quit() },
        ],
        cols,
        col_width,
        theme,
    );

    lines
}

/// Blank line, section title and a separator rule.
fn section(lines: &mut Vec<Line<'static>>, title: &'static str, sep_width: usize, theme: &Theme) {
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(format!("  {title}"), theme.popup_title)));
    let rule = "\u{2500}".repeat(sep_width.saturating_sub(title.width() + 3));
    lines.push(Line::from(Span::styled(format!("  {rule}"), theme.dim)));
}

/// Lay out shortcuts in N columns per row.
fn add_shortcuts_columns(
    lines: &mut Vec<Line<'static>>,
    shortcuts: &[Shortcut],
    cols: usize,
    col_width: usize,
    theme: &Theme,
) {
    let key_w: usize = 9;

    for row in shortcuts.chunks(cols) {
        let mut spans: Vec<Span<'static>> = vec![Span::raw("  ")];

        for s in row {
            let padded_key = format!("{:>width$}", s.key, width = key_w);
            let desc_avail = col_width.saturating_sub(key_w + 3);
            let desc: String = s.desc.chars().take(desc_avail).collect();
            let padding = col_width
                .saturating_sub(key_w + 1 + desc.width())
                .max(1);

            spans.push(Span::styled(padded_key, theme.key_hint));
            spans.push(Span::styled(format!(" {desc}"), theme.popup));
            spans.push(Span::raw(" ".repeat(padding)));
        }

        lines.push(Line::from(spans));
    }
}
