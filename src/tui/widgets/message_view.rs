//! Message view widget: header block, attachments and body of one viewer.

use chrono::Utc;
use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};
use ratatui::Frame;

use super::attachment_menu;
use crate::i18n;
use crate::tui::app::ViewerPane;
use crate::tui::theme::Theme;
use crate::viewer::present::{self, BodyView, MessagePresentation, Presentation};
use crate::viewer::MessageViewer;

/// Render `viewer` into `area`, clamping the pane's scroll offset.
pub fn render(
    frame: &mut Frame,
    viewer: &MessageViewer,
    pane: &mut ViewerPane,
    area: Rect,
    theme: &Theme,
    title: &str,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border)
        .title(Span::styled(format!(" {title} "), theme.popup_title))
        .title(
            Line::from(vec![
                Span::styled(" [s] ", theme.key_hint),
                Span::styled(format!("{} ", i18n::view_source()), theme.dim),
            ])
            .alignment(Alignment::Right),
        );

    let inner = block.inner(area);
    pane.view_height = inner.height as usize;
    frame.render_widget(block, area);

    let presentation = present::present(viewer, Utc::now());
    let lines = match &presentation {
        Presentation::Loading => vec![Line::from(Span::styled(i18n::loading(), theme.dim))],
        Presentation::Error { source } => error_lines(source, theme),
        Presentation::Loaded(msg) => message_lines(msg, pane, inner.width as usize, theme),
    };

    let max_scroll =
        wrapped_height(&lines, inner.width as usize).saturating_sub(inner.height as usize);
    pane.scroll = pane.scroll.min(max_scroll);

    let paragraph = Paragraph::new(lines)
        .scroll((u16::try_from(pane.scroll).unwrap_or(u16::MAX), 0))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, inner);

    if let (Some(selected), Presentation::Loaded(msg)) = (pane.menu, &presentation) {
        if let Some(control) = msg.attachments.get(pane.attachment_selected) {
            attachment_menu::render(frame, control, selected, area, theme);
        }
    }
}

fn error_lines<'a>(source: &str, theme: &Theme) -> Vec<Line<'a>> {
    let mut lines = vec![
        Line::from(Span::styled(i18n::error_title(), theme.error)),
        Line::from(Span::styled(i18n::error_unparsed(), theme.message_body)),
        Line::from(""),
    ];
    lines.extend(
        source
            .lines()
            .map(|l| Line::from(Span::styled(l.to_string(), theme.source))),
    );
    lines
}

fn message_lines<'a>(
    msg: &MessagePresentation,
    pane: &ViewerPane,
    width: usize,
    theme: &Theme,
) -> Vec<Line<'a>> {
    let h = &msg.header;
    let mut lines = vec![Line::from(Span::styled(h.subject.clone(), theme.subject))];

    let mut from = Vec::new();
    if !h.sender_name.is_empty() {
        from.push(Span::styled(
            format!("{} ", h.sender_name),
            theme.message_header_value,
        ));
    }
    from.push(Span::styled(h.sender_email.clone(), theme.dim));
    lines.push(Line::from(from));

    for (label, value) in [(i18n::label_to(), &h.to), (i18n::label_cc(), &h.cc)] {
        if let Some(value) = value {
            lines.push(Line::from(vec![
                Span::styled(format!("{label} "), theme.message_header_label),
                Span::styled(value.clone(), theme.message_header_value),
            ]));
        }
    }

    let mut date = vec![Span::styled(h.date.date.clone(), theme.message_header_value)];
    if let Some(relative) = &h.date.relative {
        date.push(Span::styled(format!(" ({relative})"), theme.dim));
    }
    lines.push(Line::from(date));

    let separator = || Line::from(Span::styled("\u{2500}".repeat(width), theme.border));

    if !msg.attachments.is_empty() {
        lines.push(separator());
        lines.push(Line::from(Span::styled(
            format!("{} ({})", i18n::tui_attachments(), msg.attachments.len()),
            theme.message_header_label,
        )));
        for control in &msg.attachments {
            let selected = control.index == pane.attachment_selected;
            let (marker, style) = if selected {
                ("\u{25b8} ", theme.selected)
            } else {
                ("  ", theme.attachment)
            };
            let actions: Vec<&str> = control.actions.iter().map(|a| a.label()).collect();
            lines.push(Line::from(vec![
                Span::styled(marker, style),
                Span::styled(format!("{} {}", control.icon.glyph(), control.label), style),
                Span::styled(format!("  {}", control.size), theme.dim),
                Span::styled(format!("  [{}]", actions.join(" | ")), theme.dim),
            ]));
        }
    }

    match &msg.body {
        BodyView::Html(body) => {
            lines.push(separator());
            lines.extend(body.iter().map(|l| style_body_line(l, theme)));
        }
        BodyView::PlainText(text) => {
            lines.push(separator());
            lines.extend(
                text.lines()
                    .map(|l| Line::from(Span::styled(l.to_string(), theme.source))),
            );
        }
        BodyView::Empty => {}
    }

    lines
}

/// Style a single body line, highlighting URLs.
fn style_body_line<'a>(line: &str, theme: &Theme) -> Line<'a> {
    let mut spans = Vec::new();
    let mut last_end = 0;

    let mut starts: Vec<usize> = line
        .match_indices("http://")
        .chain(line.match_indices("https://"))
        .map(|(start, _)| start)
        .collect();
    starts.sort_unstable();

    for start in starts {
        if start < last_end {
            continue;
        }
        if start > last_end {
            spans.push(Span::styled(
                line[last_end..start].to_string(),
                theme.message_body,
            ));
        }

        // URL ends at whitespace, a closing bracket or a quote
        let rest = &line[start..];
        let url_len = rest
            .find(|c: char| c.is_whitespace() || matches!(c, '>' | ')' | ']' | '"'))
            .unwrap_or(rest.len());
        spans.push(Span::styled(rest[..url_len].to_string(), theme.url));
        last_end = start + url_len;
    }

    if last_end < line.len() {
        spans.push(Span::styled(
            line[last_end..].to_string(),
            theme.message_body,
        ));
    }

    if spans.is_empty() {
        Line::from(Span::styled(line.to_string(), theme.message_body))
    } else {
        Line::from(spans)
    }
}

/// Rows `lines` take once wrapped to `width` columns.
pub(crate) fn wrapped_height(lines: &[Line], width: usize) -> usize {
    if width == 0 {
        return lines.len();
    }
    lines
        .iter()
        .map(|line| line.width().div_ceil(width).max(1))
        .sum()
}
