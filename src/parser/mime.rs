//! `mail-parser` backed implementation of [`EmlParser`].

use mail_parser::{Message, MessageParser, MessagePart, MimeHeaders, PartType};
use tracing::debug;

use super::header;
use super::EmlParser;
use crate::error::{EmlError, Result};
use crate::model::address::EmailAddress;
use crate::model::attachment::{Attachment, AttachmentPayload};
use crate::model::mail::ParsedMessage;

/// The default parser, delegating MIME decoding to `mail-parser`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MailParser;

impl EmlParser for MailParser {
    fn parse(&self, raw: &[u8]) -> Result<ParsedMessage> {
        let message_bytes = skip_from_line(raw);

        let headers =
            header::unfold_headers(&header::decode_header_bytes(header::header_block(message_bytes)));
        if headers.is_empty() {
            return Err(EmlError::Parse("no header fields found".into()));
        }

        let msg = MessageParser::default()
            .parse(message_bytes)
            .ok_or_else(|| EmlError::Parse("the MIME structure could not be read".into()))?;

        let attachments: Vec<Attachment> = msg
            .attachments()
            .map(attachment_from_part)
            .collect();

        debug!(
            headers = headers.len(),
            attachments = attachments.len(),
            "Parsed message"
        );

        Ok(ParsedMessage {
            subject: msg.subject().map(str::to_string),
            from: EmailAddress::list_from(msg.from())
                .into_iter()
                .next()
                .unwrap_or_default(),
            to: EmailAddress::list_from(msg.to()),
            cc: EmailAddress::list_from(msg.cc()),
            date: header::message_date(&headers),
            text: text_body(&msg),
            html: html_body(&msg),
            attachments,
        })
    }
}

/// The first genuine `text/plain` body part.
///
/// `mail-parser` points its text body at the HTML part when there is no
/// plain-text alternative; that case yields `None` here.
fn text_body(msg: &Message<'_>) -> Option<String> {
    match &msg.text_part(0)?.body {
        PartType::Text(text) => Some(text.to_string()),
        _ => None,
    }
}

/// The first genuine `text/html` body part.
fn html_body(msg: &Message<'_>) -> Option<String> {
    match &msg.html_part(0)?.body {
        PartType::Html(html) => Some(html.to_string()),
        _ => None,
    }
}

/// Build an [`Attachment`] from a MIME part.
fn attachment_from_part(part: &MessagePart<'_>) -> Attachment {
    let content_type = part.content_type().map(|ct| {
        let mut full = match ct.subtype() {
            Some(sub) => format!("{}/{}", ct.ctype(), sub),
            None => ct.ctype().to_string(),
        };
        if let Some(attributes) = ct.attributes() {
            for (name, value) in attributes {
                full.push_str(&format!("; {name}={value}"));
            }
        }
        full
    });

    // mail-parser keeps the undecoded body and resets `encoding` when base64
    // decoding fails, so the declared transfer encoding is what identifies it.
    let broken_base64 = part.is_encoding_problem
        && part
            .content_transfer_encoding()
            .is_some_and(|cte| cte.trim().eq_ignore_ascii_case("base64"));
    let payload = if broken_base64 {
        let text: String = String::from_utf8_lossy(part.contents())
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        AttachmentPayload::Base64(text)
    } else {
        AttachmentPayload::Bytes(part.contents().to_vec())
    };

    Attachment {
        name: part.attachment_name().map(str::to_string),
        content_type,
        payload,
    }
}

/// Skip a leading BOM and the `From ` separator line of messages cut out of an MBOX.
fn skip_from_line(data: &[u8]) -> &[u8] {
    let data = data.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(data);

    if data.starts_with(b"From ") {
        if let Some(pos) = data.iter().position(|&b| b == b'\n') {
            return &data[pos + 1..];
        }
    }
    data
}
