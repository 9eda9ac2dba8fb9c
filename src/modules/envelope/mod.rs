// Copyright © 2025 mailbridge.dev
// Licensed under Mailbridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::imap::flags::{self, MessageFlag};
use async_imap::types::{Fetch, Flag};
use itertools::Itertools;
use mail_parser::{Addr as MimeAddr, Address as MimeAddress, MessageParser};
use serde::{Deserialize, Serialize};

/// A parsed mailbox participant: display name and/or bare address.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct Addr {
    pub name: Option<String>,
    pub address: Option<String>,
}

impl From<&MimeAddr<'_>> for Addr {
    fn from(value: &MimeAddr) -> Self {
        Addr {
            name: value.name.as_ref().map(|n| n.to_string()),
            address: value.address.as_ref().map(|a| a.to_string()),
        }
    }
}

impl std::fmt::Display for Addr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.name, &self.address) {
            (Some(name), Some(address)) => write!(f, "{} <{}>", name, address),
            (None, Some(address)) => write!(f, "{}", address),
            (Some(name), None) => write!(f, "{}", name),
            (None, None) => Ok(()),
        }
    }
}

/// One row of a mailbox listing. Ephemeral: built per response, never
/// cached, and only valid until the message moves mailboxes (the
/// (mailbox, uid) pair is the sole identity).
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct MessageHeaderSummary {
    pub uid: u32,
    pub mailbox: String,
    pub from: String,
    pub to: String,
    pub subject: String,
    pub date: String,
    pub seen: bool,
    pub flags: Vec<String>,
}

/// Build a summary from a header-fields fetch. Returns `None` when the
/// server reported no UID for the record (an untagged response for some
/// other client's activity).
pub fn summarize(fetch: &Fetch, mailbox: &str) -> Option<MessageHeaderSummary> {
    let uid = fetch.uid?;
    let flags: Vec<String> = fetch
        .flags()
        .filter(|f| !matches!(f, Flag::Recent))
        .map(|f| MessageFlag::from(f).to_string())
        .collect();
    let header = fetch.header().unwrap_or_default();
    Some(summarize_header_bytes(header, uid, mailbox, flags))
}

/// Pure core of [`summarize`]: malformed headers degrade to empty fields,
/// never to an error, so a single broken message cannot break a listing.
pub(crate) fn summarize_header_bytes(
    header: &[u8],
    uid: u32,
    mailbox: &str,
    flags: Vec<String>,
) -> MessageHeaderSummary {
    let parsed = MessageParser::new().parse(header);
    let seen = flags::is_seen(flags.iter().map(String::as_str));
    match parsed {
        Some(message) => MessageHeaderSummary {
            uid,
            mailbox: mailbox.to_string(),
            from: format_addresses(message.from()),
            to: format_addresses(message.to()),
            subject: message.subject().unwrap_or_default().to_string(),
            date: message
                .date()
                .map(|d| d.to_rfc3339())
                .unwrap_or_default(),
            seen,
            flags,
        },
        None => MessageHeaderSummary {
            uid,
            mailbox: mailbox.to_string(),
            seen,
            flags,
            ..Default::default()
        },
    }
}

pub(crate) fn format_addresses(address: Option<&MimeAddress<'_>>) -> String {
    collect_addresses(address)
        .iter()
        .map(ToString::to_string)
        .join(", ")
}

pub(crate) fn collect_addresses(address: Option<&MimeAddress<'_>>) -> Vec<Addr> {
    match address {
        Some(MimeAddress::List(addrs)) => addrs.iter().map(Addr::from).collect(),
        Some(MimeAddress::Group(groups)) => groups
            .iter()
            .flat_map(|group| group.addresses.iter().map(Addr::from))
            .collect(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &[u8] = b"From: Alice Example <alice@example.com>\r\n\
To: bob@example.com, Carol <carol@example.com>\r\n\
Subject: Lunch?\r\n\
Date: Tue, 14 Jan 2025 10:30:00 +0000\r\n\r\n";

    #[test]
    fn summary_renders_addresses_and_subject() {
        let summary =
            summarize_header_bytes(HEADER, 42, "INBOX", vec!["\\Seen".into(), "\\Answered".into()]);
        assert_eq!(summary.uid, 42);
        assert_eq!(summary.mailbox, "INBOX");
        assert_eq!(summary.from, "Alice Example <alice@example.com>");
        assert_eq!(summary.to, "bob@example.com, Carol <carol@example.com>");
        assert_eq!(summary.subject, "Lunch?");
        assert!(summary.seen);
    }

    #[test]
    fn seen_flag_is_normalized_case_insensitively() {
        let summary = summarize_header_bytes(HEADER, 1, "INBOX", vec!["\\SEEN".into()]);
        assert!(summary.seen);
        let summary = summarize_header_bytes(HEADER, 1, "INBOX", vec!["\\Flagged".into()]);
        assert!(!summary.seen);
    }

    #[test]
    fn garbage_header_degrades_to_empty_fields() {
        let summary = summarize_header_bytes(&[0xff, 0xfe, 0x00], 7, "INBOX", vec![]);
        assert_eq!(summary.uid, 7);
        assert_eq!(summary.subject, "");
        assert_eq!(summary.from, "");
        assert!(!summary.seen);
    }
}
