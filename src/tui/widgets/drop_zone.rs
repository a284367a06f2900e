//! Drop zone: where files are pasted or dragged onto the terminal.

use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::i18n;
use crate::page::RejectReason;
use crate::tui::app::App;

/// Render the drop zone. `compact` is the single-line form shown above a loaded message.
pub fn render(frame: &mut Frame, app: &App, area: Rect, compact: bool) {
    let theme = &app.theme;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border)
        .title(Span::styled(format!(" {} ", i18n::drop_title()), theme.popup_title));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let accepted = app.page.zone().extensions.join(", ");
    let mut lines = Vec::new();

    if app.page.is_reading() {
        lines.push(Line::from(Span::styled(
            format!("{}\u{2026}", i18n::tui_loading_file()),
            theme.dim,
        )));
    } else {
        lines.push(Line::from(vec![
            Span::styled(i18n::drop_message(), theme.drop_zone),
            Span::styled(format!("  ({accepted})"), theme.dim),
        ]));
    }

    if !compact {
        if app.page.viewer().is_none() {
            lines.insert(0, Line::from(""));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(i18n::tui_no_message(), theme.dim)));
        }
        for (path, reason) in &app.last_rejected {
            let why = match reason {
                RejectReason::InvalidType => i18n::err_not_eml(),
                RejectReason::TooMany => i18n::err_too_many_files(),
            };
            lines.push(Line::from(Span::styled(
                format!("{}: {} ({why})", i18n::drop_rejected(), path.display()),
                theme.error,
            )));
        }
        // Vertically center the block of text
        let pad = (inner.height as usize).saturating_sub(lines.len()) / 2;
        for _ in 0..pad {
            lines.insert(0, Line::from(""));
        }
    }

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, inner);
}
