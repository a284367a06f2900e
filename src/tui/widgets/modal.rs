//! Modal overlays: raw source and nested messages.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use ratatui::Frame;

use super::{inset, message_view};
use crate::tui::app::{Modal, ModalContent};
use crate::tui::theme::Theme;

/// Render `modal` at stacking `depth` over `screen`.
pub fn render(frame: &mut Frame, modal: &mut Modal, depth: usize, screen: Rect, theme: &Theme) {
    let margin = 2 + (depth as u16).min(8);
    let area = inset(screen, margin);
    frame.render_widget(Clear, area);

    match &mut modal.content {
        ModalContent::Source { text, scroll } => {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(theme.popup_title)
                .title(Span::styled(format!(" {} ", modal.title), theme.popup_title))
                .style(theme.popup);
            let inner = block.inner(area);

            let lines: Vec<Line> = text
                .lines()
                .map(|l| Line::from(Span::styled(l.to_string(), theme.source)))
                .collect();
            let max_scroll = lines.len().saturating_sub(inner.height as usize);
            *scroll = (*scroll).min(max_scroll);

            // Source is shown unwrapped, the way it is stored
            let paragraph = Paragraph::new(lines)
                .block(block)
                .scroll((u16::try_from(*scroll).unwrap_or(u16::MAX), 0));
            frame.render_widget(paragraph, area);
        }
        ModalContent::Message { viewer, pane } => {
            message_view::render(frame, viewer, pane, area, theme, &modal.title);
        }
    }
}
