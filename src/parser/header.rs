//! Raw header block handling: locating it, unfolding it, and reading `Date:`.
//!
//! `mail-parser` does the heavy lifting for everything else; these helpers
//! decide whether a text looks like an Internet message at all and keep the
//! `Date:` header around verbatim so an unparseable value can be reported.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use tracing::debug;

use crate::model::mail::MessageDate;

/// Return the header block of a raw message (everything before the first blank line).
pub fn header_block(data: &[u8]) -> &[u8] {
    for i in 0..data.len() {
        if data[i..].starts_with(b"\n\n") || data[i..].starts_with(b"\r\n\r\n") {
            return &data[..i];
        }
    }
    data
}

/// Decode raw header bytes to a string.
///
/// Tries UTF-8 first, then falls back to Windows-1252 (which accepts every byte).
pub fn decode_header_bytes(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            decoded.into_owned()
        }
    }
}

/// Unfold headers into `(lowercase_name, value)` pairs.
///
/// Continuation lines are joined to the previous field. Lines whose name is
/// not a valid RFC 5322 field name are skipped.
pub fn unfold_headers(text: &str) -> Vec<(String, String)> {
    let mut result: Vec<(String, String)> = Vec::new();

    for line in text.lines() {
        if line.starts_with(' ') || line.starts_with('\t') {
            if let Some(last) = result.last_mut() {
                last.1.push(' ');
                last.1.push_str(line.trim());
            }
            continue;
        }
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        if is_field_name(name) {
            result.push((name.to_ascii_lowercase(), value.trim().to_string()));
        }
    }

    result
}

/// RFC 5322 §2.2: printable US-ASCII except colon, at least one character.
fn is_field_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| (33..=126).contains(&b) && b != b':')
}

/// Get the first value for a header name (case-insensitive).
pub fn get_header(headers: &[(String, String)], name: &str) -> Option<String> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.clone())
}

/// Classify the `Date:` header of an unfolded header list.
pub fn message_date(headers: &[(String, String)]) -> MessageDate {
    match get_header(headers, "date") {
        None => MessageDate::Missing,
        Some(raw) => match parse_date(&raw) {
            Some(dt) => MessageDate::Valid(dt),
            None => MessageDate::Invalid(raw),
        },
    }
}

/// Parse an email date string.
///
/// Accepts RFC 2822, RFC 3339, a few common broken variants and, as a last
/// resort, whatever `mail-parser` understands.
pub fn parse_date(date_str: &str) -> Option<DateTime<Utc>> {
    let trimmed = date_str.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    let candidate = replace_named_tz(strip_day_of_week(trimmed));
    const FORMATS: [&str; 5] = [
        "%d %b %Y %H:%M:%S %z",
        "%d %b %Y %H:%M %z",
        "%Y-%m-%d %H:%M:%S %z",
        "%d %b %Y %H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
    ];
    for fmt in FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&candidate, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(ndt) = NaiveDateTime::parse_from_str(&candidate, fmt) {
            return Some(Utc.from_utc_datetime(&ndt));
        }
    }

    if let Some(dt) = mail_parser_date(trimmed) {
        return Some(dt);
    }

    debug!(date = trimmed, "Date header is not a calendar date");
    None
}

/// Ask `mail-parser` to read a lone `Date:` value.
fn mail_parser_date(input: &str) -> Option<DateTime<Utc>> {
    let fake_msg = format!("Date: {input}\n\n");
    let parsed = mail_parser::MessageParser::default().parse(fake_msg.as_bytes())?;
    let rfc3339 = parsed.date()?.to_rfc3339();
    DateTime::parse_from_rfc3339(&rfc3339)
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

/// Strip a leading day-of-week prefix (`"Thu, "` or `"Thu "`).
fn strip_day_of_week(s: &str) -> &str {
    const DAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
    for day in DAYS {
        if let Some(rest) = s.strip_prefix(day) {
            return rest.trim_start_matches(',').trim_start();
        }
    }
    s
}

/// Replace a trailing timezone abbreviation with its numeric offset.
fn replace_named_tz(s: &str) -> String {
    const ZONES: [(&str, &str); 10] = [
        ("CEST", "+0200"),
        ("EST", "-0500"),
        ("EDT", "-0400"),
        ("CST", "-0600"),
        ("CDT", "-0500"),
        ("PST", "-0800"),
        ("PDT", "-0700"),
        ("GMT", "+0000"),
        ("UTC", "+0000"),
        ("CET", "+0100"),
    ];
    for (name, offset) in ZONES {
        if let Some(head) = s.strip_suffix(name) {
            return format!("{head}{offset}");
        }
    }
    s.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_block_lf() {
        let data = b"From: a@b.com\nSubject: Hi\n\nBody\n";
        assert_eq!(header_block(data), b"From: a@b.com\nSubject: Hi");
    }

    #[test]
    fn test_header_block_crlf() {
        let data = b"From: a@b.com\r\nSubject: Hi\r\n\r\nBody\r\n";
        assert_eq!(header_block(data), b"From: a@b.com\r\nSubject: Hi");
    }

    #[test]
    fn test_header_block_without_body() {
        let data = b"Subject: only headers";
        assert_eq!(header_block(data), data);
    }

    #[test]
    fn test_unfold_headers() {
        let text = "Subject: This is a long\n\tsubject line\nFrom: user@example.com\n";
        let headers = unfold_headers(text);
        assert_eq!(headers.len(), 2);
        assert_eq!(headers[0].0, "subject");
        assert_eq!(headers[0].1, "This is a long subject line");
    }

    #[test]
    fn test_unfold_skips_prose() {
        let headers = unfold_headers("this is not an email\nDear Bob: hello\n");
        assert!(headers.is_empty());
    }

    #[test]
    fn test_decode_header_bytes_latin1_fallback() {
        assert_eq!(decode_header_bytes(b"Subject: caf\xe9"), "Subject: café");
    }

    #[test]
    fn test_parse_date_rfc2822() {
        let dt = parse_date("Thu, 04 Jan 2024 10:00:00 +0000").expect("valid date");
        assert_eq!(dt.format("%Y-%m-%d").to_string(), "2024-01-04");
    }

    #[test]
    fn test_parse_date_named_tz() {
        let dt = parse_date("Thu, 04 Jan 2024 10:00:00 EST").expect("valid date");
        assert_eq!(dt.format("%H").to_string(), "15");
    }

    #[test]
    fn test_parse_date_iso8601() {
        assert!(parse_date("2024-01-04T10:00:00Z").is_some());
    }

    #[test]
    fn test_parse_date_garbage() {
        assert!(parse_date("someday soon").is_none());
        assert!(parse_date("").is_none());
    }

    #[test]
    fn test_message_date_states() {
        assert_eq!(message_date(&[]), MessageDate::Missing);
        let bad = vec![("date".to_string(), "someday soon".to_string())];
        assert_eq!(
            message_date(&bad),
            MessageDate::Invalid("someday soon".to_string())
        );
        let good = vec![(
            "date".to_string(),
            "Thu, 04 Jan 2024 10:00:00 +0000".to_string(),
        )];
        assert!(matches!(message_date(&good), MessageDate::Valid(_)));
    }
}
