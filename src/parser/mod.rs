//! Message parsing: the parser port, its `mail-parser` implementation,
//! header helpers, and HTML sanitization.

pub mod header;
pub mod html;
pub mod mime;

use crate::error::Result;
use crate::model::mail::ParsedMessage;

pub use mime::MailParser;

/// Turns raw EML bytes into a [`ParsedMessage`].
///
/// The input is the message exactly as read, so 8-bit parts keep their own
/// charsets. Implementations run on worker threads, hence the `Send + Sync` bound.
pub trait EmlParser: Send + Sync {
    /// Parse `raw`, or explain why it is not a message.
    fn parse(&self, raw: &[u8]) -> Result<ParsedMessage>;
}
