//! Action menu opened on an attachment with Enter.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use super::centered_rect_exact;
use crate::tui::theme::Theme;
use crate::viewer::present::{AttachmentAction, AttachmentControl};

/// Render the actions of `control` centered in `area`, `selected` highlighted.
pub fn render(
    frame: &mut Frame,
    control: &AttachmentControl,
    selected: usize,
    area: Rect,
    theme: &Theme,
) {
    let title = format!(" {} {} ", control.icon.glyph(), control.label);
    let width = (title.width() as u16 + 4).clamp(24, area.width.max(24));
    let height = control.actions.len() as u16 + 2;
    let popup = centered_rect_exact(width, height, area);

    frame.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.popup_title)
        .title(title)
        .style(theme.popup);

    let lines: Vec<Line> = control
        .actions
        .iter()
        .enumerate()
        .map(|(i, action)| {
            let key = match action {
                AttachmentAction::Download => "d",
                AttachmentAction::View => "v",
            };
            let style = if i == selected {
                theme.selected
            } else {
                theme.popup
            };
            Line::from(vec![
                Span::styled(format!(" {key} "), theme.key_hint),
                Span::styled(action.label(), style),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
