//! Path input line, opened with `o`.

use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use super::centered_rect_exact;
use crate::i18n;
use crate::tui::app::App;

/// Render the prompt popup if it is open.
pub fn render(frame: &mut Frame, app: &App) {
    let Some(input) = &app.prompt else {
        return;
    };
    let theme = &app.theme;
    let screen = frame.area();
    let width = (screen.width * 70 / 100).max(40);
    let area = centered_rect_exact(width, 3, screen);

    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.popup_title)
        .title(format!(" {} ", i18n::drop_title()))
        .style(theme.popup);

    // Keep the end of long paths in view
    let avail = area.width.saturating_sub(4) as usize;
    let prompt = i18n::prompt_path();
    let shown: String = {
        let room = avail.saturating_sub(prompt.chars().count() + 1);
        let skip = input.chars().count().saturating_sub(room);
        input.chars().skip(skip).collect()
    };

    let line = Line::from(vec![
        Span::styled(prompt, theme.key_hint),
        Span::styled(shown, theme.popup),
        Span::styled("_", theme.key_hint),
    ]);
    frame.render_widget(Paragraph::new(line).block(block), area);
}
