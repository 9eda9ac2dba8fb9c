// Copyright © 2025 mailbridge.dev
// Licensed under Mailbridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::encode_mailbox_name;
use crate::modules::account::MailCredentials;
use crate::modules::context::MAIL_CONTEXT;
use crate::modules::error::code::ErrorCode;
use crate::modules::error::MailBridgeResult;
use crate::modules::mailbox::resolver;
use crate::modules::message::codec::{self, AttachmentContent};
use crate::modules::message::fetch_raw;
use crate::raise_error;

/// Fetch one attachment's bytes on demand, addressed by its position in
/// the message's attachment list as reported by the listing/read views.
pub async fn fetch_attachment(
    credentials: &MailCredentials,
    mailbox: &str,
    uid: u32,
    index: usize,
) -> MailBridgeResult<AttachmentContent> {
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

    codec::attachment_at(&raw, index).ok_or_else(|| {
        raise_error!(
            format!("Message UID {uid} has no attachment at index {index}"),
            ErrorCode::ResourceNotFound
        )
    })
}
