//! Attachment and source actions, and the ports they go through.
//!
//! The viewer never touches the screen or the disk directly. Modals are
//! requested from an [`Overlay`], files are handed to a [`FileHost`]; the TUI
//! and the CLI provide real implementations, tests provide recording fakes.

use std::path::PathBuf;

use tracing::info;

use super::MessageViewer;
use crate::error::{EmlError, Result};
use crate::i18n;
use crate::model::attachment::{Attachment, AttachmentPayload};
use crate::model::mail::MessageSource;

/// Media type declared on `data:` URI downloads.
const DATA_URI_MEDIA_TYPE: &str = "application/octet-stream";

/// What a modal shows.
#[derive(Debug)]
pub enum ModalBody {
    /// Raw text displayed as an unformatted code block.
    Source(String),
    /// A nested viewer for an embedded message.
    Message(Box<MessageViewer>),
}

/// A request to show a dismissible overlay.
#[derive(Debug)]
pub struct ModalRequest {
    pub title: String,
    pub body: ModalBody,
}

/// Something that can display modal overlays.
pub trait Overlay {
    fn open(&mut self, request: ModalRequest);
}

/// Requests are simply queued when a plain vector is the overlay host.
impl Overlay for Vec<ModalRequest> {
    fn open(&mut self, request: ModalRequest) {
        self.push(request);
    }
}

/// A file download, in one of its two forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadRequest {
    /// Decoded bytes with their MIME type.
    Blob {
        file_name: String,
        content_type: String,
        bytes: Vec<u8>,
    },
    /// A `data:` URI carrying base64 content.
    DataUri { file_name: String, uri: String },
}

impl DownloadRequest {
    /// Name the file is saved under.
    pub fn file_name(&self) -> &str {
        match self {
            Self::Blob { file_name, .. } | Self::DataUri { file_name, .. } => file_name,
        }
    }
}

/// Platform file primitives: saving downloads and opening files externally.
pub trait FileHost {
    /// Save a download. Returns where it ended up.
    fn download(&mut self, request: DownloadRequest) -> Result<PathBuf>;

    /// Show content with the system viewer without saving it as a download.
    fn open_external(&mut self, file_name: &str, content_type: &str, bytes: &[u8]) -> Result<()>;
}

/// What the View action ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewOutcome {
    /// A nested viewer was opened in a modal.
    Nested,
    /// The attachment was handed to the system viewer.
    External,
    /// Only base64 text was available, so the attachment was downloaded instead.
    Downloaded(PathBuf),
}

/// Build the `data:` URI for base64 content.
pub fn data_uri(base64: &str) -> String {
    format!("data:{DATA_URI_MEDIA_TYPE};base64,{base64}")
}

impl Attachment {
    /// The download this attachment resolves to.
    ///
    /// Decoded bytes become a blob typed with the primary MIME type; base64
    /// text becomes a `data:` URI.
    pub fn download_request(&self) -> DownloadRequest {
        let file_name = self.display_name();
        match &self.payload {
            AttachmentPayload::Bytes(bytes) => DownloadRequest::Blob {
                file_name,
                content_type: self.primary_type(),
                bytes: bytes.clone(),
            },
            AttachmentPayload::Base64(text) => DownloadRequest::DataUri {
                file_name,
                uri: data_uri(text),
            },
        }
    }
}

impl MessageViewer {
    /// Open the raw source in a modal.
    pub fn view_source(&self, overlay: &mut dyn Overlay) {
        overlay.open(ModalRequest {
            title: i18n::source_title().to_string(),
            body: ModalBody::Source(self.source().as_str().to_string()),
        });
    }

    /// Download the attachment at `index`.
    pub fn download_attachment(&self, index: usize, host: &mut dyn FileHost) -> Result<PathBuf> {
        let attachment = self
            .attachment(index)
            .ok_or(EmlError::AttachmentNotFound(index))?;
        let request = attachment.download_request();
        info!(index, file = request.file_name(), "Downloading attachment");
        host.download(request)
    }

    /// View the attachment at `index`.
    ///
    /// Embedded messages open in a nested viewer; other types go to the
    /// system viewer. Fails if the View action is not offered.
    pub fn view_attachment(
        &self,
        index: usize,
        overlay: &mut dyn Overlay,
        host: &mut dyn FileHost,
    ) -> Result<ViewOutcome> {
        let attachment = self
            .attachment(index)
            .ok_or(EmlError::AttachmentNotFound(index))?;
        if !attachment.is_viewable() {
            return Err(EmlError::NotViewable(attachment.display_name()));
        }

        let bytes = match &attachment.payload {
            AttachmentPayload::Bytes(bytes) => bytes,
            AttachmentPayload::Base64(_) => {
                let path = host.download(attachment.download_request())?;
                return Ok(ViewOutcome::Downloaded(path));
            }
        };

        let title = attachment.display_name();
        if attachment.is_embedded_message() {
            info!(index, title = %title, "Opening embedded message");
            let nested = self.nested(MessageSource::from_bytes(bytes));
            overlay.open(ModalRequest {
                title,
                body: ModalBody::Message(Box::new(nested)),
            });
            return Ok(ViewOutcome::Nested);
        }

        info!(index, title = %title, "Opening attachment externally");
        host.open_external(&title, &attachment.primary_type(), bytes)?;
        Ok(ViewOutcome::External)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attachment(ct: Option<&str>, payload: AttachmentPayload) -> Attachment {
        Attachment {
            name: Some("report.pdf".into()),
            content_type: ct.map(String::from),
            payload,
        }
    }

    #[test]
    fn test_bytes_become_blob_with_primary_type() {
        let att = attachment(
            Some("application/pdf; name=report.pdf"),
            AttachmentPayload::Bytes(vec![1, 2, 3]),
        );
        assert_eq!(
            att.download_request(),
            DownloadRequest::Blob {
                file_name: "report.pdf".into(),
                content_type: "application/pdf".into(),
                bytes: vec![1, 2, 3],
            }
        );
    }

    #[test]
    fn test_missing_type_defaults_to_text_plain() {
        let att = attachment(None, AttachmentPayload::Bytes(vec![]));
        match att.download_request() {
            DownloadRequest::Blob { content_type, .. } => assert_eq!(content_type, "text/plain"),
            other => panic!("expected blob, got {other:?}"),
        }
    }

    #[test]
    fn test_base64_becomes_data_uri() {
        let att = attachment(
            Some("application/pdf"),
            AttachmentPayload::Base64("AQID".into()),
        );
        assert_eq!(
            att.download_request(),
            DownloadRequest::DataUri {
                file_name: "report.pdf".into(),
                uri: "data:application/octet-stream;base64,AQID".into(),
            }
        );
    }

    #[test]
    fn test_vec_overlay_records() {
        let mut requests: Vec<ModalRequest> = Vec::new();
        requests.open(ModalRequest {
            title: "t".into(),
            body: ModalBody::Source("s".into()),
        });
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].title, "t");
    }
}
