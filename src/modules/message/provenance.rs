// Copyright © 2025 mailbridge.dev
// Licensed under Mailbridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use chrono::{DateTime, SecondsFormat, Utc};
use regex::bytes::Regex;
use std::sync::LazyLock;

/// Injected at the top of a message when it is archived by a synthetic
/// move. These two lines are the only record of where the message came
/// from; restore parses them and strips them symmetrically.
pub const MOVED_AT_HEADER: &str = "X-MOVED-AT";
pub const ORIGINAL_MAILBOX_HEADER: &str = "X-ORIGINAL-MAILBOX";

static MOVED_AT_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^x-moved-at:").unwrap());
static ORIGINAL_MAILBOX_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^x-original-mailbox:\s*(.*?)\s*$").unwrap());

/// Prepend the provenance headers to a raw message. The wire format is
/// fixed: `X-MOVED-AT: <ISO-8601>\r\nX-ORIGINAL-MAILBOX: <path>\r\n`
/// ahead of the original header block, which is carried through
/// byte-for-byte.
pub fn stamp(raw: &[u8], original_mailbox: &str, moved_at: DateTime<Utc>) -> Vec<u8> {
    let prefix = format!(
        "{}: {}\r\n{}: {}\r\n",
        MOVED_AT_HEADER,
        moved_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        ORIGINAL_MAILBOX_HEADER,
        original_mailbox
    );
    let mut stamped = Vec::with_capacity(prefix.len() + raw.len());
    stamped.extend_from_slice(prefix.as_bytes());
    stamped.extend_from_slice(raw);
    stamped
}

/// The mailbox path recorded at move time, if any. Absence means "origin
/// unknown": the caller falls back to the default inbox.
pub fn original_mailbox(raw: &[u8]) -> Option<String> {
    for line in physical_lines(raw) {
        if let Some(captures) = ORIGINAL_MAILBOX_LINE.captures(trim_line_ending(line)) {
            let value = String::from_utf8_lossy(&captures[1]).into_owned();
            if value.is_empty() {
                return None;
            }
            return Some(value);
        }
    }
    None
}

/// Remove every physical line carrying either provenance header,
/// case-insensitively, leaving all other bytes untouched. The mirror of
/// [`stamp`]: a restored message must not leak the markers back into the
/// mailbox it returns to.
pub fn strip(raw: &[u8]) -> Vec<u8> {
    physical_lines(raw)
        .filter(|line| {
            let trimmed = trim_line_ending(line);
            !MOVED_AT_LINE.is_match(trimmed) && !ORIGINAL_MAILBOX_LINE.is_match(trimmed)
        })
        .flatten()
        .copied()
        .collect()
}

fn physical_lines(raw: &[u8]) -> impl Iterator<Item = &[u8]> {
    raw.split_inclusive(|&byte| byte == b'\n')
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const ORIGINAL: &[u8] = b"From: alice@example.com\r\n\
Subject: hello\r\n\r\n\
body line one\r\n";

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 9, 14, 30, 0).unwrap()
    }

    #[test]
    fn stamp_prepends_the_exact_wire_format() {
        let stamped = stamp(ORIGINAL, "INBOX.Archive", at());
        let expected_prefix =
            b"X-MOVED-AT: 2025-03-09T14:30:00Z\r\nX-ORIGINAL-MAILBOX: INBOX.Archive\r\n";
        assert!(stamped.starts_with(expected_prefix));
        assert!(stamped.ends_with(ORIGINAL));
        assert_eq!(stamped.len(), expected_prefix.len() + ORIGINAL.len());
    }

    #[test]
    fn stamp_then_strip_restores_the_original_bytes() {
        let stamped = stamp(ORIGINAL, "Sent Items", at());
        assert_eq!(strip(&stamped), ORIGINAL);
    }

    #[test]
    fn original_mailbox_reads_back_what_stamp_wrote() {
        let stamped = stamp(ORIGINAL, "INBOX.Projects", at());
        assert_eq!(
            original_mailbox(&stamped).as_deref(),
            Some("INBOX.Projects")
        );
    }

    #[test]
    fn extraction_and_strip_are_case_insensitive() {
        let raw = b"x-moved-at: 2024-01-01T00:00:00Z\r\n\
X-Original-Mailbox: Drafts\r\n\
From: a@example.com\r\n\r\nbody\r\n";
        assert_eq!(original_mailbox(raw).as_deref(), Some("Drafts"));
        let stripped = strip(raw);
        assert_eq!(&stripped[..], b"From: a@example.com\r\n\r\nbody\r\n" as &[u8]);
    }

    #[test]
    fn absent_header_means_origin_unknown() {
        assert_eq!(original_mailbox(ORIGINAL), None);
        let empty_value = b"X-ORIGINAL-MAILBOX:\r\nFrom: a@b.c\r\n\r\n";
        assert_eq!(original_mailbox(empty_value), None);
    }

    #[test]
    fn strip_leaves_unrelated_headers_alone() {
        let raw = b"X-Mailer: something\r\nFrom: a@example.com\r\n\r\nX-MOVED-ALONG: not ours\r\n";
        assert_eq!(strip(raw), raw);
    }

    #[test]
    fn strip_handles_bare_lf_line_endings() {
        let raw = b"X-MOVED-AT: 2024-01-01T00:00:00Z\nFrom: a@example.com\n\nbody\n";
        assert_eq!(&strip(raw)[..], b"From: a@example.com\n\nbody\n" as &[u8]);
    }
}
