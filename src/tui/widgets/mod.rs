//! TUI widgets for rendering different UI panels.

pub mod attachment_menu;
pub mod drop_zone;
pub mod header_bar;
pub mod help_popup;
pub mod message_view;
pub mod modal;
pub mod path_prompt;
pub mod status_bar;

use ratatui::layout::Rect;

/// Calculate a centered rectangle with exact dimensions, clamped to `area`.
pub fn centered_rect_exact(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}

/// Shrink `area` by `margin` cells on every side.
pub fn inset(area: Rect, margin: u16) -> Rect {
    let dx = margin.min(area.width / 2);
    let dy = margin.min(area.height / 2);
    Rect::new(
        area.x + dx,
        area.y + dy,
        area.width - 2 * dx,
        area.height - 2 * dy,
    )
}
