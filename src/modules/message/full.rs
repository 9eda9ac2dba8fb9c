// Copyright © 2025 mailbridge.dev
// Licensed under Mailbridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::encode_mailbox_name;
use crate::modules::account::MailCredentials;
use crate::modules::context::MAIL_CONTEXT;
use crate::modules::error::code::ErrorCode;
use crate::modules::error::MailBridgeResult;
use crate::modules::mailbox::resolver;
use crate::modules::message::codec::{self, AttachmentMeta};
use crate::modules::message::fetch_raw;
use crate::raise_error;
use serde::{Deserialize, Serialize};

/// A fully decoded message as the reading pane renders it. Attachment
/// bytes are not here; they are fetched separately, by index.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct MessageBody {
    pub uid: u32,
    pub mailbox: String,
    pub from: String,
    pub to: String,
    pub subject: String,
    pub date: String,
    pub text: Option<String>,
    pub html: Option<String>,
    pub attachments: Vec<AttachmentMeta>,
}

/// Read one message in full. The mailbox name is looked up leniently; an
/// absent UID is `ResourceNotFound`, which callers treat as a normal
/// outcome of racing another client.
pub async fn fetch_message(
    credentials: &MailCredentials,
    mailbox: &str,
    uid: u32,
) -> MailBridgeResult<MessageBody> {
    let executor = MAIL_CONTEXT.imap(credentials).await?;
    let actual = resolver::locate(&executor, mailbox).await?.ok_or_else(|| {
        raise_error!(
            format!("No mailbox matching '{mailbox}'"),
            ErrorCode::ResourceNotFound
        )
    })?;

    let raw = fetch_raw(&executor, &encode_mailbox_name!(&actual), uid)
        .await?
        .ok_or_else(|| {
            raise_error!(
                format!("No message with UID {uid} in mailbox '{actual}'"),
                ErrorCode::ResourceNotFound
            )
        })?;

    let content = codec::parse(&raw);
    Ok(MessageBody {
        uid,
        mailbox: actual,
        from: content.from,
        to: content.to,
        subject: content.subject,
        date: content.date,
        text: content.text,
        html: content.html,
        attachments: content.attachments,
    })
}
