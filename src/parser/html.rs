//! HTML bodies: sanitization with `ammonia`, terminal rendering with `html2text`.

/// Narrowest width handed to the renderer.
const MIN_WIDTH: usize = 20;

/// A sanitized HTML body and the lines it renders to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedHtml {
    /// HTML with scripts, event handlers and other active content removed.
    pub sanitized: String,
    /// Terminal lines rendered from `sanitized`.
    pub lines: Vec<String>,
}

impl RenderedHtml {
    /// Sanitize `html` and render it at `width` columns.
    pub fn new(html: &str, width: usize) -> Self {
        let sanitized = sanitize(html);
        let lines = render(&sanitized, width);
        Self { sanitized, lines }
    }
}

/// Strip active and unsafe content from an HTML document.
pub fn sanitize(html: &str) -> String {
    ammonia::clean(html)
}

/// Render already sanitized HTML into wrapped terminal lines.
pub fn render(sanitized: &str, width: usize) -> Vec<String> {
    let text = html2text::from_read(sanitized.as_bytes(), width.max(MIN_WIDTH));
    let mut lines: Vec<String> = text.lines().map(|l| l.trim_end().to_string()).collect();
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}
