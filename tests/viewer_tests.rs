//! Integration tests for the message viewer, its presentation, and attachment actions.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{TimeZone, Utc};
use emlshell::error::{EmlError, Result};
use emlshell::model::mail::MessageSource;
use emlshell::page::read_source;
use emlshell::viewer::actions::{
    DownloadRequest, FileHost, ModalBody, ModalRequest, ViewOutcome,
};
use emlshell::viewer::icon::AttachmentIcon;
use emlshell::viewer::present::{self, AttachmentAction, BodyView, Presentation};
use emlshell::viewer::{MessageViewer, ViewState, ViewerOptions};

const PARSE_TIMEOUT: Duration = Duration::from_secs(10);

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn loaded_viewer(name: &str) -> MessageViewer {
    let source = read_source(&fixture(name)).unwrap();
    let mut viewer = MessageViewer::new(source, ViewerOptions::default());
    assert!(viewer.wait(PARSE_TIMEOUT), "parse of {name} did not finish");
    viewer
}

fn loaded_presentation(viewer: &MessageViewer) -> present::MessagePresentation {
    // Noon on the day the multipart fixture was sent
    let now = Utc.with_ymd_and_hms(2024, 1, 4, 12, 0, 0).unwrap();
    match present::present(viewer, now) {
        Presentation::Loaded(msg) => msg,
        other => panic!("expected a loaded message, got {other:?}"),
    }
}

/// Records every request instead of touching the filesystem.
#[derive(Default)]
struct RecordingHost {
    downloads: Vec<DownloadRequest>,
    opened: Vec<(String, String, Vec<u8>)>,
}

impl FileHost for RecordingHost {
    fn download(&mut self, request: DownloadRequest) -> Result<PathBuf> {
        let path = PathBuf::from("/downloads").join(request.file_name());
        self.downloads.push(request);
        Ok(path)
    }

    fn open_external(&mut self, file_name: &str, content_type: &str, bytes: &[u8]) -> Result<()> {
        self.opened
            .push((file_name.to_string(), content_type.to_string(), bytes.to_vec()));
        Ok(())
    }
}

// ─── Header block ───────────────────────────────────────────────────

#[test]
fn test_header_block_of_multipart_message() {
    let viewer = loaded_viewer("multipart.eml");
    let msg = loaded_presentation(&viewer);
    let h = &msg.header;
    assert_eq!(h.subject, "Quarterly report");
    assert_eq!(h.sender_name, "Alice Example");
    assert_eq!(h.sender_email, "<alice@example.com>");
    assert_eq!(
        h.to.as_deref(),
        Some("Bob <bob@example.com>, Carol <carol@example.com>")
    );
    assert_eq!(h.cc.as_deref(), Some("Erin <erin@example.com>"));
    assert_eq!(h.date.relative.as_deref(), Some("2 hours ago"));
    assert_ne!(h.date.date, "Invalid Date");
}

#[test]
fn test_missing_subject_and_date() {
    let viewer = loaded_viewer("no_subject.eml");
    let msg = loaded_presentation(&viewer);
    assert_eq!(msg.header.subject, "No subject");
    assert_eq!(msg.header.date.date, "Invalid Date");
    assert!(msg.header.date.relative.is_none());
    assert!(msg.header.cc.is_none());
}

#[test]
fn test_unparseable_date_has_no_relative_time() {
    let viewer = loaded_viewer("invalid_date.eml");
    let msg = loaded_presentation(&viewer);
    assert_eq!(msg.header.subject, "When?");
    assert_eq!(msg.header.date.date, "Invalid Date");
    assert!(msg.header.date.relative.is_none());
}

#[test]
fn test_custom_date_format() {
    let source = read_source(&fixture("multipart.eml")).unwrap();
    let options = ViewerOptions {
        date_format: Some("year %Y".into()),
        ..ViewerOptions::default()
    };
    let mut viewer = MessageViewer::new(source, options);
    assert!(viewer.wait(PARSE_TIMEOUT));
    let msg = loaded_presentation(&viewer);
    assert_eq!(msg.header.date.date, "year 2024");
}

#[test]
fn test_unusable_date_format_falls_back_to_localized_date() {
    let source = read_source(&fixture("multipart.eml")).unwrap();
    let options = ViewerOptions {
        date_format: Some("%Q".into()),
        ..ViewerOptions::default()
    };
    let mut viewer = MessageViewer::new(source, options);
    assert!(viewer.wait(PARSE_TIMEOUT));
    let msg = loaded_presentation(&viewer);
    assert!(msg.header.date.date.contains("2024"));
    assert_eq!(msg.header.date.relative.as_deref(), Some("2 hours ago"));
}

// ─── Body ───────────────────────────────────────────────────────────

#[test]
fn test_html_body_is_sanitized() {
    let viewer = loaded_viewer("multipart.eml");
    let rendered = viewer
        .loaded()
        .and_then(|l| l.rendered_html.as_ref())
        .expect("html part");
    assert!(!rendered.sanitized.contains("<script"));
    assert!(!rendered.sanitized.contains("onclick"));
    assert!(rendered.sanitized.contains("team"));

    match loaded_presentation(&viewer).body {
        BodyView::Html(lines) => {
            let text = lines.join("\n");
            assert!(text.contains("quarterly report is attached"));
            assert!(!text.contains("alert"));
        }
        other => panic!("expected html body, got {other:?}"),
    }
}

#[test]
fn test_html_only_message() {
    let viewer = loaded_viewer("html_only.eml");
    let loaded = viewer.loaded().unwrap();
    assert!(loaded.message.text.is_none());
    let rendered = loaded.rendered_html.as_ref().unwrap();
    assert!(!rendered.sanitized.contains("onerror"));
    assert!(matches!(loaded_presentation(&viewer).body, BodyView::Html(_)));
}

#[test]
fn test_plain_text_body() {
    let viewer = loaded_viewer("no_subject.eml");
    match loaded_presentation(&viewer).body {
        BodyView::PlainText(text) => assert!(text.contains("neither subject nor date")),
        other => panic!("expected plain text body, got {other:?}"),
    }
}

// ─── Error state ────────────────────────────────────────────────────

#[test]
fn test_unparseable_source_shows_verbatim_text() {
    let raw = "just some words\nwithout any header\n";
    let mut viewer = MessageViewer::new(MessageSource::new(raw), ViewerOptions::default());
    assert!(viewer.wait(PARSE_TIMEOUT));
    assert_eq!(viewer.state(), &ViewState::Error);
    assert!(viewer.loaded().is_none());

    let now = Utc::now();
    match present::present(&viewer, now) {
        Presentation::Error { source } => assert_eq!(source, raw),
        other => panic!("expected error, got {other:?}"),
    }
}

#[test]
fn test_new_source_replaces_error() {
    let mut viewer = MessageViewer::new(MessageSource::new("garbage"), ViewerOptions::default());
    assert!(viewer.wait(PARSE_TIMEOUT));
    assert_eq!(viewer.state(), &ViewState::Error);

    viewer.set_source(read_source(&fixture("no_subject.eml")).unwrap());
    assert!(viewer.is_loading());
    assert!(viewer.wait(PARSE_TIMEOUT));
    assert!(viewer.loaded().is_some());
}

// ─── Attachments ────────────────────────────────────────────────────

#[test]
fn test_attachment_controls() {
    let viewer = loaded_viewer("multipart.eml");
    let controls = loaded_presentation(&viewer).attachments;
    assert_eq!(controls.len(), 3);

    assert_eq!(controls[0].label, "report.pdf");
    assert_eq!(controls[0].icon, AttachmentIcon::Pdf);
    assert_eq!(
        controls[0].actions,
        vec![AttachmentAction::Download, AttachmentAction::View]
    );

    assert_eq!(controls[1].label, "data.zip");
    assert_eq!(controls[1].icon, AttachmentIcon::Archive);
    assert_eq!(controls[1].actions, vec![AttachmentAction::Download]);

    assert_eq!(controls[2].label, "forwarded.eml");
    assert!(controls[2].actions.contains(&AttachmentAction::View));
}

#[test]
fn test_download_uses_primary_type() {
    let viewer = loaded_viewer("multipart.eml");
    let mut host = RecordingHost::default();
    let path = viewer.download_attachment(0, &mut host).unwrap();
    assert_eq!(path, PathBuf::from("/downloads/report.pdf"));

    match &host.downloads[0] {
        DownloadRequest::Blob {
            file_name,
            content_type,
            bytes,
        } => {
            assert_eq!(file_name, "report.pdf");
            assert_eq!(content_type, "application/pdf");
            assert!(bytes.starts_with(b"%PDF-1.4"));
        }
        other => panic!("expected blob, got {other:?}"),
    }
}

#[test]
fn test_download_out_of_range() {
    let viewer = loaded_viewer("multipart.eml");
    let mut host = RecordingHost::default();
    let err = viewer.download_attachment(7, &mut host).unwrap_err();
    assert!(matches!(err, EmlError::AttachmentNotFound(7)));
    assert!(host.downloads.is_empty());
}

#[test]
fn test_view_pdf_opens_externally() {
    let viewer = loaded_viewer("multipart.eml");
    let mut overlay: Vec<ModalRequest> = Vec::new();
    let mut host = RecordingHost::default();
    let outcome = viewer.view_attachment(0, &mut overlay, &mut host).unwrap();
    assert_eq!(outcome, ViewOutcome::External);
    assert!(overlay.is_empty());
    assert_eq!(host.opened.len(), 1);
    assert_eq!(host.opened[0].0, "report.pdf");
    assert_eq!(host.opened[0].1, "application/pdf");
}

#[test]
fn test_view_zip_is_refused() {
    let viewer = loaded_viewer("multipart.eml");
    let mut overlay: Vec<ModalRequest> = Vec::new();
    let mut host = RecordingHost::default();
    let err = viewer.view_attachment(1, &mut overlay, &mut host).unwrap_err();
    assert!(matches!(err, EmlError::NotViewable(name) if name == "data.zip"));
    assert!(host.opened.is_empty());
    assert!(host.downloads.is_empty());
}

#[test]
fn test_view_embedded_message_opens_nested_viewer() {
    let viewer = loaded_viewer("multipart.eml");
    let mut overlay: Vec<ModalRequest> = Vec::new();
    let mut host = RecordingHost::default();
    let outcome = viewer.view_attachment(2, &mut overlay, &mut host).unwrap();
    assert_eq!(outcome, ViewOutcome::Nested);
    assert!(host.opened.is_empty());
    assert_eq!(overlay.len(), 1);

    let request = overlay.pop().unwrap();
    assert_eq!(request.title, "forwarded.eml");
    let ModalBody::Message(mut nested) = request.body else {
        panic!("expected a nested message");
    };
    assert!(nested.wait(PARSE_TIMEOUT));
    let msg = loaded_presentation(&nested);
    assert_eq!(msg.header.subject, "Original plan");
    assert_eq!(msg.header.sender_email, "<dave@example.org>");
    assert!(msg.attachments.is_empty());

    // The outer viewer is untouched
    assert_eq!(
        loaded_presentation(&viewer).header.subject,
        "Quarterly report"
    );
}

#[test]
fn test_nested_message_keeps_its_charset() {
    let viewer = loaded_viewer("nested_latin1.eml");
    let mut overlay: Vec<ModalRequest> = Vec::new();
    let mut host = RecordingHost::default();
    let outcome = viewer.view_attachment(0, &mut overlay, &mut host).unwrap();
    assert_eq!(outcome, ViewOutcome::Nested);

    let request = overlay.pop().unwrap();
    assert_eq!(request.title, "menu.eml");
    let ModalBody::Message(mut nested) = request.body else {
        panic!("expected a nested message");
    };
    assert!(nested.wait(PARSE_TIMEOUT));
    assert!(nested.source().as_bytes().contains(&0xE9));
    match loaded_presentation(&nested).body {
        BodyView::PlainText(text) => assert_eq!(text.trim_end(), "Caf\u{e9} cr\u{e8}me"),
        other => panic!("expected plain text body, got {other:?}"),
    }
}

#[test]
fn test_broken_base64_downloads_as_data_uri() {
    let viewer = loaded_viewer("broken_base64.eml");
    let mut host = RecordingHost::default();
    viewer.download_attachment(0, &mut host).unwrap();
    assert_eq!(
        host.downloads,
        vec![DownloadRequest::DataUri {
            file_name: "photo.png".into(),
            uri: "data:application/octet-stream;base64,AQID***notbase64!!".into(),
        }]
    );
}

#[test]
fn test_view_of_broken_base64_falls_back_to_download() {
    let viewer = loaded_viewer("broken_base64.eml");
    let mut overlay: Vec<ModalRequest> = Vec::new();
    let mut host = RecordingHost::default();
    let outcome = viewer.view_attachment(0, &mut overlay, &mut host).unwrap();
    assert_eq!(
        outcome,
        ViewOutcome::Downloaded(PathBuf::from("/downloads/photo.png"))
    );
    assert!(host.opened.is_empty());
    assert!(matches!(host.downloads[0], DownloadRequest::DataUri { .. }));
}

// ─── Source ─────────────────────────────────────────────────────────

#[test]
fn test_view_source_opens_raw_text() {
    let viewer = loaded_viewer("multipart.eml");
    let mut overlay: Vec<ModalRequest> = Vec::new();
    viewer.view_source(&mut overlay);
    assert_eq!(overlay.len(), 1);
    assert_eq!(overlay[0].title, "Email Source");
    match &overlay[0].body {
        ModalBody::Source(text) => {
            assert_eq!(text.as_str(), viewer.source().as_str());
            assert!(text.contains("<script>alert('xss')</script>"));
        }
        other => panic!("expected source body, got {other:?}"),
    }
}

#[test]
fn test_plain_text_rendering() {
    let viewer = loaded_viewer("multipart.eml");
    let out = present::to_plain_text(&present::present(&viewer, Utc::now()));
    assert!(out.starts_with("Quarterly report\n"));
    assert!(out.contains("Alice Example <alice@example.com>"));
    assert!(out.contains("report.pdf"));
}
