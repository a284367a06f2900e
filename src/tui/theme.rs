//! Color theme definitions for the TUI.

use ratatui::style::{Color, Modifier, Style};

/// A complete color theme for the TUI.
#[derive(Debug, Clone)]
pub struct Theme {
    pub header_bar: Style,
    pub status_bar: Style,
    pub selected: Style,
    pub subject: Style,
    pub message_header_label: Style,
    pub message_header_value: Style,
    pub message_body: Style,
    pub source: Style,
    pub dim: Style,
    pub url: Style,
    pub attachment: Style,
    pub error: Style,
    pub drop_zone: Style,
    pub border: Style,
    pub popup: Style,
    pub popup_title: Style,
    pub key_hint: Style,
}

impl Theme {
    /// Theme by configuration name; unknown names fall back to dark.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Dark theme (default).
    pub fn dark() -> Self {
        Self {
            header_bar: Style::default()
                .fg(Color::Rgb(200, 200, 220))
                .bg(Color::Rgb(30, 30, 46)),
            status_bar: Style::default()
                .fg(Color::Rgb(150, 150, 170))
                .bg(Color::Rgb(30, 30, 46)),
            selected: Style::default()
                .fg(Color::White)
                .bg(Color::Rgb(60, 60, 100)),
            subject: Style::default()
                .fg(Color::Rgb(235, 235, 245))
                .add_modifier(Modifier::BOLD),
            message_header_label: Style::default()
                .fg(Color::Rgb(130, 170, 255))
                .add_modifier(Modifier::BOLD),
            message_header_value: Style::default().fg(Color::Rgb(220, 220, 230)),
            message_body: Style::default().fg(Color::Rgb(220, 220, 230)),
            source: Style::default().fg(Color::Rgb(180, 200, 180)),
            dim: Style::default().fg(Color::Rgb(120, 120, 140)),
            url: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::UNDERLINED),
            attachment: Style::default().fg(Color::Green),
            error: Style::default()
                .fg(Color::Rgb(255, 120, 120))
                .add_modifier(Modifier::BOLD),
            drop_zone: Style::default().fg(Color::Rgb(160, 160, 190)),
            border: Style::default().fg(Color::Rgb(80, 80, 100)),
            popup: Style::default()
                .fg(Color::Rgb(220, 220, 230))
                .bg(Color::Rgb(20, 20, 35)),
            popup_title: Style::default()
                .fg(Color::Rgb(130, 170, 255))
                .add_modifier(Modifier::BOLD),
            key_hint: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Light theme.
    pub fn light() -> Self {
        Self {
            header_bar: Style::default()
                .fg(Color::Rgb(30, 30, 50))
                .bg(Color::Rgb(220, 220, 235)),
            status_bar: Style::default()
                .fg(Color::Rgb(70, 70, 90))
                .bg(Color::Rgb(220, 220, 235)),
            selected: Style::default()
                .fg(Color::Black)
                .bg(Color::Rgb(180, 200, 250)),
            subject: Style::default()
                .fg(Color::Rgb(10, 10, 20))
                .add_modifier(Modifier::BOLD),
            message_header_label: Style::default()
                .fg(Color::Rgb(30, 70, 180))
                .add_modifier(Modifier::BOLD),
            message_header_value: Style::default().fg(Color::Rgb(30, 30, 40)),
            message_body: Style::default().fg(Color::Rgb(30, 30, 40)),
            source: Style::default().fg(Color::Rgb(40, 90, 40)),
            dim: Style::default().fg(Color::Rgb(120, 120, 130)),
            url: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
            attachment: Style::default().fg(Color::Rgb(0, 120, 0)),
            error: Style::default()
                .fg(Color::Rgb(180, 20, 20))
                .add_modifier(Modifier::BOLD),
            drop_zone: Style::default().fg(Color::Rgb(90, 90, 120)),
            border: Style::default().fg(Color::Rgb(160, 160, 180)),
            popup: Style::default()
                .fg(Color::Rgb(30, 30, 40))
                .bg(Color::Rgb(245, 245, 250)),
            popup_title: Style::default()
                .fg(Color::Rgb(30, 70, 180))
                .add_modifier(Modifier::BOLD),
            key_hint: Style::default()
                .fg(Color::Rgb(160, 90, 0))
                .add_modifier(Modifier::BOLD),
        }
    }
}
