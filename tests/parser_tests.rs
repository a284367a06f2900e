//! Integration tests for EML parsing, header decoding, and HTML sanitization.

use std::path::Path;

use chrono::{Datelike, Timelike};
use emlshell::model::attachment::AttachmentPayload;
use emlshell::model::mail::MessageDate;
use emlshell::parser::header::parse_date;
use emlshell::parser::html;
use emlshell::parser::{EmlParser, MailParser};
use emlshell::viewer::actions::DownloadRequest;

fn fixture(name: &str) -> Vec<u8> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read(path).unwrap()
}

// ─── Multipart message ──────────────────────────────────────────────

#[test]
fn test_parse_multipart_headers() {
    let msg = MailParser.parse(&fixture("multipart.eml")).unwrap();
    assert_eq!(msg.subject.as_deref(), Some("Quarterly report"));
    assert_eq!(msg.from.display_name, "Alice Example");
    assert_eq!(msg.from.address, "alice@example.com");
    assert_eq!(msg.to.len(), 2);
    assert_eq!(msg.to[1].display_name, "Carol");
    assert_eq!(msg.cc.len(), 1);
    assert_eq!(msg.cc[0].address, "erin@example.com");

    let date = msg.date.valid().expect("valid date");
    assert_eq!((date.year(), date.month(), date.day()), (2024, 1, 4));
    assert_eq!(date.hour(), 10);
}

#[test]
fn test_parse_multipart_bodies() {
    let msg = MailParser.parse(&fixture("multipart.eml")).unwrap();
    let text = msg.text.unwrap();
    assert!(text.starts_with("Hello team,"));
    assert!(text.contains("https://example.com/q1"));
    // The raw HTML is kept as-is; sanitizing happens when rendering
    assert!(msg.html.unwrap().contains("<script>"));
}

#[test]
fn test_parse_multipart_attachments() {
    let msg = MailParser.parse(&fixture("multipart.eml")).unwrap();
    assert_eq!(msg.attachments.len(), 3);

    let pdf = &msg.attachments[0];
    assert_eq!(pdf.name.as_deref(), Some("report.pdf"));
    assert_eq!(pdf.primary_type(), "application/pdf");
    assert!(pdf
        .content_type
        .as_deref()
        .unwrap()
        .starts_with("application/pdf;"));
    match &pdf.payload {
        AttachmentPayload::Bytes(bytes) => assert!(bytes.starts_with(b"%PDF-1.4")),
        other => panic!("expected decoded bytes, got {other:?}"),
    }

    let zip = &msg.attachments[1];
    assert_eq!(zip.primary_type(), "application/zip");
    assert_eq!(zip.size(), 22);
    assert!(!zip.is_viewable());

    let forwarded = &msg.attachments[2];
    assert_eq!(forwarded.primary_type(), "message/rfc822");
    assert!(forwarded.is_embedded_message());
    match &forwarded.payload {
        AttachmentPayload::Bytes(bytes) => {
            let raw = String::from_utf8_lossy(bytes);
            assert!(raw.contains("Subject: Original plan"));
        }
        other => panic!("expected raw message bytes, got {other:?}"),
    }
}

#[test]
fn test_parse_embedded_message_on_its_own() {
    let outer = MailParser.parse(&fixture("multipart.eml")).unwrap();
    let AttachmentPayload::Bytes(bytes) = &outer.attachments[2].payload else {
        panic!("expected bytes");
    };
    let inner = MailParser.parse(bytes).unwrap();
    assert_eq!(inner.subject.as_deref(), Some("Original plan"));
    assert_eq!(inner.from.address, "dave@example.org");
    assert!(inner.attachments.is_empty());
}

#[test]
fn test_broken_base64_attachment_keeps_text() {
    let msg = MailParser.parse(&fixture("broken_base64.eml")).unwrap();
    assert_eq!(msg.attachments.len(), 1);

    let photo = &msg.attachments[0];
    assert_eq!(
        photo.payload,
        AttachmentPayload::Base64("AQID***notbase64!!".to_string())
    );
    assert_eq!(
        photo.download_request(),
        DownloadRequest::DataUri {
            file_name: "photo.png".to_string(),
            uri: "data:application/octet-stream;base64,AQID***notbase64!!".to_string(),
        }
    );
}

#[test]
fn test_embedded_message_keeps_its_charset() {
    let outer = MailParser.parse(&fixture("nested_latin1.eml")).unwrap();
    let AttachmentPayload::Bytes(bytes) = &outer.attachments[0].payload else {
        panic!("expected bytes");
    };
    assert!(bytes.windows(4).any(|w| w == b"Caf\xe9"));

    let inner = MailParser.parse(bytes).unwrap();
    assert_eq!(inner.subject.as_deref(), Some("Menu"));
    assert_eq!(
        inner.text.as_deref().map(str::trim_end),
        Some("Caf\u{e9} cr\u{e8}me")
    );
}

// ─── Single-part messages ───────────────────────────────────────────

#[test]
fn test_parse_html_only() {
    let msg = MailParser.parse(&fixture("html_only.eml")).unwrap();
    assert_eq!(msg.subject.as_deref(), Some("Weekly news"));
    assert!(msg.text.is_none());
    assert!(msg.html.unwrap().contains("<h1>Weekly news</h1>"));
    assert_eq!(msg.to[0].address, "reader@example.com");
    assert!(msg.to[0].display_name.is_empty());
}

#[test]
fn test_parse_without_subject_or_date() {
    let msg = MailParser.parse(&fixture("no_subject.eml")).unwrap();
    assert!(msg.subject.is_none());
    assert_eq!(msg.date, MessageDate::Missing);
    assert!(msg.text.unwrap().contains("neither subject nor date"));
}

#[test]
fn test_parse_invalid_date() {
    let msg = MailParser.parse(&fixture("invalid_date.eml")).unwrap();
    assert_eq!(
        msg.date,
        MessageDate::Invalid("sometime next week".to_string())
    );
}

#[test]
fn test_parse_encoded_subject() {
    let raw = "From: =?UTF-8?B?Sm9zw6k=?= <jose@example.com>\n\
Subject: =?ISO-8859-1?Q?caf=E9?=\n\
\n\
body\n";
    let msg = MailParser.parse(raw.as_bytes()).unwrap();
    assert_eq!(msg.subject.as_deref(), Some("café"));
    assert_eq!(msg.from.display_name, "José");
}

#[test]
fn test_parse_rejects_text_file() {
    assert!(MailParser.parse(&fixture("notes.txt")).is_err());
}

// ─── Dates ──────────────────────────────────────────────────────────

#[test]
fn test_date_parsing_formats() {
    let d1 = parse_date("Thu, 04 Jan 2024 10:00:00 +0000").unwrap();
    assert_eq!(d1.hour(), 10);

    let d2 = parse_date("04 Jan 2024 10:00:00 +0000").unwrap();
    assert_eq!(d1, d2);

    let d3 = parse_date("Thu, 04 Jan 2024 10:00:00 EST").unwrap();
    assert_eq!(d3.hour(), 15);

    let d4 = parse_date("2024-01-04T10:00:00Z").unwrap();
    assert_eq!(d1, d4);

    assert!(parse_date("not a date").is_none());
}

// ─── HTML ───────────────────────────────────────────────────────────

#[test]
fn test_sanitize_fixture_html() {
    let msg = MailParser.parse(&fixture("html_only.eml")).unwrap();
    let clean = html::sanitize(&msg.html.unwrap());
    assert!(!clean.contains("onerror"));
    assert!(clean.contains("https://example.com/news"));

    let lines = html::render(&clean, 80);
    assert!(lines.iter().any(|l| l.contains("Weekly news")));
}
