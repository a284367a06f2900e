//! Presentation model derived from a viewer's state.
//!
//! Everything here is pure: the TUI draws a [`Presentation`], `show` prints
//! it with [`to_plain_text`], and tests assert on it directly.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, Utc};
use humansize::{format_size, DECIMAL};

use super::icon::AttachmentIcon;
use super::{LoadedMessage, MessageViewer, ViewState, ViewerOptions};
use crate::i18n::{self, TimeUnit};
use crate::model::address::EmailAddress;
use crate::model::attachment::Attachment;
use crate::model::mail::{MessageDate, ParsedMessage};

/// Top-level presentation of a viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presentation {
    Loading,
    /// Error panel plus the source exactly as supplied.
    Error { source: String },
    Loaded(MessagePresentation),
}

/// A loaded message ready to draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagePresentation {
    pub header: HeaderBlock,
    pub attachments: Vec<AttachmentControl>,
    pub body: BodyView,
}

/// Subject, sender, recipients and date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderBlock {
    pub subject: String,
    pub sender_name: String,
    /// Sender address wrapped in angle brackets.
    pub sender_email: String,
    /// `None` when there are no `To:` recipients.
    pub to: Option<String>,
    /// `None` when there are no `Cc:` recipients.
    pub cc: Option<String>,
    pub date: DateLine,
}

/// Rendered date. `relative` is present only for valid dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateLine {
    pub date: String,
    pub relative: Option<String>,
}

/// Action offered on an attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentAction {
    Download,
    View,
}

impl AttachmentAction {
    pub fn label(self) -> &'static str {
        match self {
            Self::Download => i18n::action_download(),
            Self::View => i18n::action_view(),
        }
    }
}

/// One attachment control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentControl {
    pub index: usize,
    pub icon: AttachmentIcon,
    pub label: String,
    pub size: String,
    pub actions: Vec<AttachmentAction>,
}

/// Body area content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyView {
    /// Sanitized HTML rendered to terminal lines.
    Html(Vec<String>),
    /// Plain text shown as an unformatted block.
    PlainText(String),
    /// Neither a text nor an HTML body.
    Empty,
}

/// Derive the presentation of `viewer` as of `now`.
pub fn present(viewer: &MessageViewer, now: DateTime<Utc>) -> Presentation {
    match viewer.state() {
        ViewState::Loading => Presentation::Loading,
        ViewState::Error => Presentation::Error {
            source: viewer.source().as_str().to_string(),
        },
        ViewState::Loaded(loaded) => {
            Presentation::Loaded(present_message(loaded, viewer.options(), now))
        }
    }
}

/// Derive the presentation of a loaded message.
pub fn present_message(
    loaded: &LoadedMessage,
    options: &ViewerOptions,
    now: DateTime<Utc>,
) -> MessagePresentation {
    let msg = &loaded.message;
    MessagePresentation {
        header: header_block(msg, options, now),
        attachments: msg
            .attachments
            .iter()
            .enumerate()
            .map(|(index, att)| attachment_control(index, att))
            .collect(),
        body: body_view(loaded),
    }
}

fn header_block(msg: &ParsedMessage, options: &ViewerOptions, now: DateTime<Utc>) -> HeaderBlock {
    HeaderBlock {
        subject: msg
            .subject
            .clone()
            .unwrap_or_else(|| i18n::no_subject().to_string()),
        sender_name: msg.from.display_name.clone(),
        sender_email: format!("<{}>", msg.from.address),
        to: format_recipients(&msg.to),
        cc: format_recipients(&msg.cc),
        date: date_line(&msg.date, options, now),
    }
}

/// Localized date plus relative time, or the invalid-date marker.
pub fn date_line(date: &MessageDate, options: &ViewerOptions, now: DateTime<Utc>) -> DateLine {
    match date {
        MessageDate::Valid(dt) => {
            let pattern = options
                .date_format
                .as_deref()
                .filter(|p| is_valid_date_format(p))
                .unwrap_or_else(|| i18n::date_pattern());
            DateLine {
                date: dt.with_timezone(&Local).format(pattern).to_string(),
                relative: Some(format_time_ago(*dt, now)),
            }
        }
        MessageDate::Missing | MessageDate::Invalid(_) => DateLine {
            date: i18n::invalid_date().to_string(),
            relative: None,
        },
    }
}

/// `true` if `pattern` is a `strftime` pattern chrono can format with.
pub fn is_valid_date_format(pattern: &str) -> bool {
    StrftimeItems::new(pattern).all(|item| !matches!(item, Item::Error))
}

/// `Name <email>` entries joined with `", "`; `None` for an empty list.
pub fn format_recipients(recipients: &[EmailAddress]) -> Option<String> {
    if recipients.is_empty() {
        return None;
    }
    Some(
        recipients
            .iter()
            .map(EmailAddress::labeled)
            .collect::<Vec<_>>()
            .join(", "),
    )
}

/// Relative time between `then` and `now`, e.g. `"3 days ago"`.
pub fn format_time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(then);
    let future = delta.num_seconds() < 0;
    let delta = delta.abs();

    let minutes = delta.num_minutes();
    let hours = delta.num_hours();
    let days = delta.num_days();

    let (count, unit) = if minutes < 1 {
        return i18n::just_now().to_string();
    } else if hours < 1 {
        (minutes, TimeUnit::Minute)
    } else if days < 1 {
        (hours, TimeUnit::Hour)
    } else if days < 30 {
        (days, TimeUnit::Day)
    } else if days < 365 {
        (days / 30, TimeUnit::Month)
    } else {
        (days / 365, TimeUnit::Year)
    };
    i18n::time_ago(count, unit, future)
}

fn attachment_control(index: usize, att: &Attachment) -> AttachmentControl {
    let mut actions = vec![AttachmentAction::Download];
    if att.is_viewable() {
        actions.push(AttachmentAction::View);
    }
    AttachmentControl {
        index,
        icon: AttachmentIcon::classify(att.content_type_or_default()),
        label: att.display_name(),
        size: format_size(att.size(), DECIMAL),
        actions,
    }
}

fn body_view(loaded: &LoadedMessage) -> BodyView {
    let msg = &loaded.message;
    let has_text = msg.text.as_deref().is_some_and(|t| !t.is_empty());
    let has_html = msg.html.as_deref().is_some_and(|h| !h.is_empty());
    if !has_text && !has_html {
        return BodyView::Empty;
    }
    match &loaded.rendered_html {
        Some(rendered) if has_html => BodyView::Html(rendered.lines.clone()),
        _ => BodyView::PlainText(
            msg.text
                .clone()
                .unwrap_or_else(|| i18n::no_text().to_string()),
        ),
    }
}

/// Render a presentation as plain text, the way `show` prints it.
pub fn to_plain_text(presentation: &Presentation) -> String {
    let mut out = String::new();
    match presentation {
        Presentation::Loading => {
            out.push_str(i18n::loading());
            out.push('\n');
        }
        Presentation::Error { source } => {
            out.push_str(i18n::error_title());
            out.push('\n');
            out.push_str(i18n::error_unparsed());
            out.push_str("\n\n");
            out.push_str(source);
            if !source.ends_with('\n') {
                out.push('\n');
            }
        }
        Presentation::Loaded(msg) => write_message(&mut out, msg),
    }
    out
}

fn write_message(out: &mut String, msg: &MessagePresentation) {
    let h = &msg.header;
    out.push_str(&h.subject);
    out.push('\n');
    out.push_str(&format!("{} {}", h.sender_name, h.sender_email).trim_start());
    out.push('\n');
    if let Some(to) = &h.to {
        out.push_str(&format!("{} {to}\n", i18n::label_to()));
    }
    if let Some(cc) = &h.cc {
        out.push_str(&format!("{} {cc}\n", i18n::label_cc()));
    }
    match &h.date.relative {
        Some(rel) => out.push_str(&format!("{} ({rel})\n", h.date.date)),
        None => out.push_str(&format!("{}\n", h.date.date)),
    }

    if !msg.attachments.is_empty() {
        out.push('\n');
        for att in &msg.attachments {
            let actions: Vec<&str> = att.actions.iter().map(|a| a.label()).collect();
            out.push_str(&format!(
                "[{}] {} {} ({}) [{}]\n",
                att.index + 1,
                att.icon.glyph(),
                att.label,
                att.size,
                actions.join(" | ")
            ));
        }
    }

    match &msg.body {
        BodyView::Html(lines) => {
            out.push('\n');
            for line in lines {
                out.push_str(line);
                out.push('\n');
            }
        }
        BodyView::PlainText(text) => {
            out.push('\n');
            out.push_str(text);
            if !text.ends_with('\n') {
                out.push('\n');
            }
        }
        BodyView::Empty => {}
    }
}
