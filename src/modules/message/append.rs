// Copyright © 2025 mailbridge.dev
// Licensed under Mailbridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::encode_mailbox_name;
use crate::modules::account::MailCredentials;
use crate::modules::context::MAIL_CONTEXT;
use crate::modules::error::MailBridgeResult;
use crate::modules::imap::executor::ImapExecutor;
use crate::modules::mailbox::resolver::{self, FolderRole};
use crate::modules::message::codec::{self, ComposeRequest};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ArchiveOutcome {
    Stored { target: String },
    Skipped { reason: SkipReason },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NoWritableFolder,
}

/// Append a raw message into the first resolvable candidate mailbox.
///
/// Finding no writable folder is a `Skipped` outcome, not an error:
/// archival is secondary to whatever user-visible action triggered it.
/// An append that fails after a folder DID open is a real fault and
/// propagates. The message is always appended whole.
pub(crate) async fn archive(
    executor: &ImapExecutor,
    raw: &[u8],
    candidates: &[String],
    flags: Option<&str>,
) -> MailBridgeResult<ArchiveOutcome> {
    let folder = match resolver::resolve(executor, candidates).await {
        Ok(folder) => folder,
        Err(error) if error.is_not_found() => {
            warn!(
                ?candidates,
                "No writable archival mailbox could be found or created: {error}"
            );
            return Ok(ArchiveOutcome::Skipped {
                reason: SkipReason::NoWritableFolder,
            });
        }
        Err(error) => return Err(error),
    };

    executor
        .append(encode_mailbox_name!(&folder.name), flags, raw)
        .await?;
    Ok(ArchiveOutcome::Stored {
        target: folder.name,
    })
}

/// Store a compose form into the Drafts mailbox. Build failures surface;
/// a missing Drafts folder is reported as `Skipped`, never as an error.
pub async fn save_draft(
    credentials: &MailCredentials,
    request: &ComposeRequest,
) -> MailBridgeResult<ArchiveOutcome> {
    let raw = codec::build(request)?;
    let executor = MAIL_CONTEXT.imap(credentials).await?;
    archive(
        &executor,
        &raw,
        &FolderRole::Drafts.candidates(),
        Some("(\\Draft)"),
    )
    .await
}

/// File a copy of an already-sent message into the Sent mailbox. The send
/// itself happened elsewhere; this is the best-effort half, so the
/// outcome reports `Skipped` rather than failing the send.
pub async fn archive_sent_copy(
    credentials: &MailCredentials,
    request: &ComposeRequest,
) -> MailBridgeResult<ArchiveOutcome> {
    let raw = codec::build(request)?;
    let executor = MAIL_CONTEXT.imap(credentials).await?;
    archive(
        &executor,
        &raw,
        &FolderRole::Sent.candidates(),
        Some("(\\Seen)"),
    )
    .await
}

/// Same as [`archive_sent_copy`], for callers that already hold the exact
/// raw bytes handed to the mail-transfer sender.
pub async fn archive_sent_raw(
    credentials: &MailCredentials,
    raw: &[u8],
) -> MailBridgeResult<ArchiveOutcome> {
    let executor = MAIL_CONTEXT.imap(credentials).await?;
    archive(
        &executor,
        raw,
        &FolderRole::Sent.candidates(),
        Some("(\\Seen)"),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcomes_serialize_for_the_api_layer() {
        let stored = serde_json::to_value(&ArchiveOutcome::Stored {
            target: "Sent Items".into(),
        })
        .unwrap();
        assert_eq!(stored["status"], "stored");
        assert_eq!(stored["target"], "Sent Items");

        let skipped = serde_json::to_value(&ArchiveOutcome::Skipped {
            reason: SkipReason::NoWritableFolder,
        })
        .unwrap();
        assert_eq!(skipped["status"], "skipped");
        assert_eq!(skipped["reason"], "no_writable_folder");
    }
}
