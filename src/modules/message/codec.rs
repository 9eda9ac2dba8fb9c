// Copyright © 2025 mailbridge.dev
// Licensed under Mailbridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::envelope::format_addresses;
use crate::modules::error::code::ErrorCode;
use crate::modules::error::MailBridgeResult;
use crate::raise_error;
use crate::validate_email;
use mail_parser::{MessageParser, MimeHeaders};
use mail_send::{
    mail_builder::{headers::address::Address, MessageBuilder},
    smtp::message::IntoMessage,
};
use serde::{Deserialize, Serialize};

/// A compose form as submitted by the UI: addresses, subject, and one or
/// both body variants.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct ComposeRequest {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub text: Option<String>,
    pub html: Option<String>,
}

/// Attachment metadata carried on listings and full reads. The binary
/// content is fetched separately, by index, so large payloads are never
/// materialized unless explicitly requested.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct AttachmentMeta {
    pub filename: String,
    pub content_type: String,
    pub size: usize,
}

/// One attachment's bytes, fetched on demand.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct AttachmentContent {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// The decoded structure of a raw message.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct MessageContent {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub date: String,
    pub text: Option<String>,
    pub html: Option<String>,
    pub attachments: Vec<AttachmentMeta>,
}

/// Decode a raw message, best-effort. Malformed MIME degrades to a
/// partial structure (empty fields, missing bodies) instead of an error:
/// a single broken message must not take down a whole mailbox view.
pub fn parse(raw: &[u8]) -> MessageContent {
    let Some(message) = MessageParser::new().parse(raw) else {
        return MessageContent::default();
    };

    let text = if message.text_body.is_empty() {
        None
    } else {
        message.body_text(0).map(|body| body.to_string())
    };
    let html = if message.html_body.is_empty() {
        None
    } else {
        message.body_html(0).map(|body| body.to_string())
    };

    let attachments = message
        .attachments()
        .enumerate()
        .map(|(index, part)| AttachmentMeta {
            filename: part
                .attachment_name()
                .map(|name| name.to_string())
                .unwrap_or_else(|| format!("attachment-{}", index + 1)),
            content_type: part
                .content_type()
                .map(|ct| match ct.subtype() {
                    Some(subtype) => format!("{}/{}", ct.ctype(), subtype),
                    None => ct.ctype().to_string(),
                })
                .unwrap_or_else(|| "application/octet-stream".to_string()),
            size: part.contents().len(),
        })
        .collect();

    MessageContent {
        from: format_addresses(message.from()),
        to: format_addresses(message.to()),
        subject: message.subject().unwrap_or_default().to_string(),
        date: message
            .date()
            .map(|d| d.to_rfc3339())
            .unwrap_or_default(),
        text,
        html,
        attachments,
    }
}

/// Pull one attachment's bytes out of a raw message.
pub(crate) fn attachment_at(raw: &[u8], index: usize) -> Option<AttachmentContent> {
    let message = MessageParser::new().parse(raw)?;
    let part = message.attachments().nth(index)?;
    Some(AttachmentContent {
        filename: part
            .attachment_name()
            .map(|name| name.to_string())
            .unwrap_or_else(|| format!("attachment-{}", index + 1)),
        content_type: part
            .content_type()
            .map(|ct| match ct.subtype() {
                Some(subtype) => format!("{}/{}", ct.ctype(), subtype),
                None => ct.ctype().to_string(),
            })
            .unwrap_or_else(|| "application/octet-stream".to_string()),
        data: part.contents().to_vec(),
    })
}

/// Serialize a compose request into a full raw message. Always succeeds
/// for well-formed input; a failure here must surface to the caller so a
/// draft or sent copy is never silently skipped.
pub fn build(request: &ComposeRequest) -> MailBridgeResult<Vec<u8>> {
    validate_email!(&request.from)?;
    if request.to.is_empty() {
        return Err(raise_error!(
            "Compose request must name at least one recipient".into(),
            ErrorCode::InvalidParameter
        ));
    }
    for recipient in &request.to {
        validate_email!(recipient)?;
    }

    let to = Address::new_list(
        request
            .to
            .iter()
            .map(|recipient| Address::from(recipient.clone()))
            .collect(),
    );

    let mut builder = MessageBuilder::new()
        .from(Address::from(request.from.clone()))
        .to(to)
        .subject(request.subject.clone());
    if let Some(html) = &request.html {
        builder = builder.html_body(html.clone());
    }
    if let Some(text) = &request.text {
        builder = builder.text_body(text.clone());
    }

    let message = builder.into_message().map_err(|e| {
        raise_error!(
            format!("Failed to build message: {}", e),
            ErrorCode::InternalError
        )
    })?;
    Ok(message.body.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compose() -> ComposeRequest {
        ComposeRequest {
            from: "alice@example.com".into(),
            to: vec!["bob@example.com".into()],
            subject: "Quarterly numbers".into(),
            text: Some("See below.".into()),
            html: Some("<p>See below.</p>".into()),
        }
    }

    #[test]
    fn built_messages_decode_back_to_their_request() {
        let raw = build(&compose()).unwrap();
        let content = parse(&raw);
        assert!(content.from.contains("alice@example.com"));
        assert!(content.to.contains("bob@example.com"));
        assert_eq!(content.subject, "Quarterly numbers");
        assert_eq!(content.text.as_deref().map(str::trim_end), Some("See below."));
        assert_eq!(
            content.html.as_deref().map(str::trim_end),
            Some("<p>See below.</p>")
        );
        assert!(content.attachments.is_empty());
    }

    #[test]
    fn build_rejects_bad_addresses_instead_of_skipping() {
        let mut request = compose();
        request.from = "not-an-address".into();
        assert!(build(&request).is_err());

        let mut request = compose();
        request.to.clear();
        assert!(build(&request).is_err());
    }

    #[test]
    fn garbage_bytes_parse_to_an_empty_structure() {
        let content = parse(b"\xff\xfe\x00\x01 not mime at all");
        assert_eq!(content.subject, "");
        assert!(content.attachments.is_empty());
    }

    #[test]
    fn attachments_expose_metadata_and_bytes_by_index() {
        let raw: &[u8] = b"From: a@example.com\r\n\
To: b@example.com\r\n\
Subject: report\r\n\
MIME-Version: 1.0\r\n\
Content-Type: multipart/mixed; boundary=\"xyz\"\r\n\r\n\
--xyz\r\n\
Content-Type: text/plain\r\n\r\n\
see attachment\r\n\
--xyz\r\n\
Content-Type: application/pdf; name=\"q3.pdf\"\r\n\
Content-Disposition: attachment; filename=\"q3.pdf\"\r\n\r\n\
%PDF-1.4 fake\r\n\
--xyz--\r\n";
        let content = parse(raw);
        assert_eq!(content.attachments.len(), 1);
        assert_eq!(content.attachments[0].filename, "q3.pdf");
        assert_eq!(content.attachments[0].content_type, "application/pdf");
        assert_eq!(
            content.text.as_deref().map(str::trim_end),
            Some("see attachment")
        );

        let attachment = attachment_at(raw, 0).unwrap();
        assert_eq!(attachment.filename, "q3.pdf");
        assert!(attachment.data.starts_with(b"%PDF-1.4"));
        assert!(attachment_at(raw, 1).is_none());
    }
}
