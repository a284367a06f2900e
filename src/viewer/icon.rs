//! Attachment icons chosen from the content type.

/// Icon shown next to an attachment name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentIcon {
    Image,
    Audio,
    Video,
    Text,
    Pdf,
    Archive,
    Word,
    Excel,
    PowerPoint,
    Code,
    Envelope,
    File,
}

/// Classification rules, tried in order. First match wins.
const RULES: &[(&[&str], AttachmentIcon)] = &[
    (&["image"], AttachmentIcon::Image),
    (&["audio"], AttachmentIcon::Audio),
    (&["video"], AttachmentIcon::Video),
    (&["text"], AttachmentIcon::Text),
    (&["pdf"], AttachmentIcon::Pdf),
    (&["zip", "compressed", "tar", "gzip"], AttachmentIcon::Archive),
    (&["msword"], AttachmentIcon::Word),
    (&["spreadsheet"], AttachmentIcon::Excel),
    (&["presentation"], AttachmentIcon::PowerPoint),
    (&["json", "xml"], AttachmentIcon::Code),
    (&["rfc822"], AttachmentIcon::Envelope),
];

impl AttachmentIcon {
    /// Pick the icon for a content type (case-insensitive substring match).
    pub fn classify(content_type: &str) -> Self {
        let ct = content_type.to_ascii_lowercase();
        RULES
            .iter()
            .find(|(needles, _)| needles.iter().any(|n| ct.contains(n)))
            .map(|(_, icon)| *icon)
            .unwrap_or(Self::File)
    }

    /// Stable icon identifier (Font Awesome names).
    pub fn name(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Audio => "volume-up",
            Self::Video => "video",
            Self::Text => "file-lines",
            Self::Pdf => "file-pdf",
            Self::Archive => "file-zipper",
            Self::Word => "file-word",
            Self::Excel => "file-excel",
            Self::PowerPoint => "file-powerpoint",
            Self::Code => "file-code",
            Self::Envelope => "envelope",
            Self::File => "file",
        }
    }

    /// Short glyph used in the terminal.
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Image => "\u{25a3}",      // ▣
            Self::Audio => "\u{266b}",      // ♫
            Self::Video => "\u{25b6}",      // ▶
            Self::Text => "\u{2261}",       // ≡
            Self::Pdf => "\u{00b6}",        // ¶
            Self::Archive => "\u{2637}",    // ☷
            Self::Word => "W",
            Self::Excel => "X",
            Self::PowerPoint => "P",
            Self::Code => "\u{2039}\u{203a}", // ‹›
            Self::Envelope => "\u{2709}",   // ✉
            Self::File => "\u{25a1}",       // □
        }
    }
}
