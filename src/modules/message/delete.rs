// Copyright © 2025 mailbridge.dev
// Licensed under Mailbridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::encode_mailbox_name;
use crate::modules::account::MailCredentials;
use crate::modules::context::MAIL_CONTEXT;
use crate::modules::error::MailBridgeResult;
use tracing::warn;

/// Permanently delete a message, bypassing Trash: flag it `\Deleted`,
/// then expunge. An expunge failure after a successful flag is not rolled
/// back; the message stays flagged and disappears on a future expunge.
pub async fn delete_message(
    credentials: &MailCredentials,
    mailbox: &str,
    uid: u32,
) -> MailBridgeResult<()> {
    let executor = MAIL_CONTEXT.imap(credentials).await?;
    let encoded = encode_mailbox_name!(mailbox);

    executor.uid_mark_deleted(&uid.to_string(), &encoded).await?;
    if let Err(error) = executor.expunge_mailbox(&encoded).await {
        warn!(
            mailbox,
            uid, "Expunge failed; message remains flagged deleted: {error:#?}"
        );
    }
    Ok(())
}
