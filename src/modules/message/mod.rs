// Copyright © 2025 mailbridge.dev
// Licensed under Mailbridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::error::code::ErrorCode;
use crate::modules::error::MailBridgeResult;
use crate::modules::imap::executor::ImapExecutor;
use crate::raise_error;

pub mod append;
pub mod attachment;
pub mod codec;
pub mod delete;
pub mod full;
pub mod list;
pub mod provenance;
pub mod trash;

/// Raw bytes of one message, or `None` when the UID is gone. The caller
/// passes the already-encoded mailbox name.
pub(crate) async fn fetch_raw(
    executor: &ImapExecutor,
    encoded_mailbox: &str,
    uid: u32,
) -> MailBridgeResult<Option<Vec<u8>>> {
    let Some(fetch) = executor.uid_fetch_full_message(uid, encoded_mailbox).await? else {
        return Ok(None);
    };
    let body = fetch.body().ok_or_else(|| {
        raise_error!(
            format!("Fetched message UID {uid} is missing its body section"),
            ErrorCode::ImapUnexpectedResult
        )
    })?;
    Ok(Some(body.to_vec()))
}
