//! Raw message sources and the structured message the parser produces.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::address::EmailAddress;
use super::attachment::Attachment;

/// The raw EML a viewer is built from.
///
/// Keeps the original bytes for the parser, which applies each part's
/// charset, plus a lossy UTF-8 rendering for display. Immutable and cheap to
/// clone; nested viewers get their own source.
#[derive(Debug, Clone)]
pub struct MessageSource {
    bytes: Arc<[u8]>,
    text: Arc<str>,
}

impl MessageSource {
    /// Wrap an EML text.
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        let text: Arc<str> = text.into();
        Self {
            bytes: Arc::from(text.as_bytes()),
            text,
        }
    }

    /// Build a source from raw bytes. The display text replaces invalid UTF-8.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            bytes: Arc::from(bytes),
            text: Arc::from(String::from_utf8_lossy(bytes).as_ref()),
        }
    }

    /// The bytes, exactly as they were supplied.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The source as text, for display.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` if the source is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl PartialEq for MessageSource {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for MessageSource {}

impl From<String> for MessageSource {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&str> for MessageSource {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<Vec<u8>> for MessageSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_bytes(&bytes)
    }
}

/// The `Date:` header, as far as it could be understood.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageDate {
    /// No `Date:` header.
    Missing,
    /// A `Date:` header that is not a calendar date. Holds the raw value.
    Invalid(String),
    /// A valid date.
    Valid(DateTime<Utc>),
}

impl MessageDate {
    /// The date, if it is a valid one.
    pub fn valid(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Valid(dt) => Some(*dt),
            _ => None,
        }
    }
}

/// A message as produced by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMessage {
    /// Decoded subject line.
    pub subject: Option<String>,

    /// Sender (first mailbox of `From:`). Empty when the header is absent.
    pub from: EmailAddress,

    /// Primary recipients, in header order.
    pub to: Vec<EmailAddress>,

    /// Carbon-copy recipients, in header order.
    pub cc: Vec<EmailAddress>,

    /// The `Date:` header.
    pub date: MessageDate,

    /// Plain-text body, from a `text/plain` part.
    pub text: Option<String>,

    /// HTML body, from a `text/html` part. Unsanitized.
    pub html: Option<String>,

    /// Attachments in MIME order.
    pub attachments: Vec<Attachment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_from_bytes_lossy() {
        let src = MessageSource::from_bytes(b"Subject: caf\xe9\n\n");
        assert!(src.as_str().starts_with("Subject: caf"));
        assert!(src.as_str().contains('\u{FFFD}'));
        assert_eq!(src.as_bytes(), b"Subject: caf\xe9\n\n");
        assert_eq!(src.len(), 15);
    }

    #[test]
    fn test_source_equality_by_content() {
        assert_eq!(MessageSource::from("a"), MessageSource::from("a".to_string()));
        assert_ne!(MessageSource::from("a"), MessageSource::from("b"));
    }

    #[test]
    fn test_message_date_valid() {
        assert!(MessageDate::Missing.valid().is_none());
        assert!(MessageDate::Invalid("soon".into()).valid().is_none());
        let now = Utc::now();
        assert_eq!(MessageDate::Valid(now).valid(), Some(now));
    }
}
