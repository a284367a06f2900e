//! Attachments and the rules that decide how they are shown and opened.

/// Fallback content type when a part declares none.
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// Substrings that make an attachment eligible for the View action.
const VIEWABLE_MARKERS: [&str; 4] = ["text", "pdf", "image", "rfc822"];

/// The attachment body as handed over by the parser.
///
/// A part carries either decoded bytes or, when the transfer encoding could
/// not be decoded, the original base64 text. Never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentPayload {
    /// Decoded content.
    Bytes(Vec<u8>),
    /// Undecoded base64 text, served through a `data:` URI.
    Base64(String),
}

impl AttachmentPayload {
    /// Size in bytes of the stored representation.
    pub fn len(&self) -> usize {
        match self {
            Self::Bytes(bytes) => bytes.len(),
            Self::Base64(text) => text.len(),
        }
    }

    /// `true` if the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A single attachment of a parsed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Filename from `Content-Disposition` / `Content-Type` parameters.
    pub name: Option<String>,

    /// Full content type including parameters (e.g. `"application/pdf; name=a.pdf"`).
    pub content_type: Option<String>,

    /// The body.
    pub payload: AttachmentPayload,
}

impl Attachment {
    /// Name shown to the user, `"No name"` when the part has none.
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| crate::i18n::no_name().to_string())
    }

    /// Content type used for icon classification, with its fallback.
    pub fn content_type_or_default(&self) -> &str {
        self.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE)
    }

    /// MIME type used for downloads: everything before the first `;`.
    pub fn primary_type(&self) -> String {
        match &self.content_type {
            Some(ct) => ct.split(';').next().unwrap_or("").trim().to_string(),
            None => DEFAULT_CONTENT_TYPE.to_string(),
        }
    }

    /// Whether the View action is offered.
    ///
    /// Matches against the full content type, parameters included.
    pub fn is_viewable(&self) -> bool {
        match &self.content_type {
            None => true,
            Some(ct) => VIEWABLE_MARKERS.iter().any(|m| ct.contains(m)),
        }
    }

    /// `true` if viewing opens a nested message instead of an external viewer.
    pub fn is_embedded_message(&self) -> bool {
        self.primary_type().contains("rfc822")
    }

    /// Size of the payload in bytes.
    pub fn size(&self) -> u64 {
        self.payload.len() as u64
    }
}
