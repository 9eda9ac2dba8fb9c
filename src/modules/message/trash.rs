// Copyright © 2025 mailbridge.dev
// Licensed under Mailbridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::encode_mailbox_name;
use crate::modules::account::MailCredentials;
use crate::modules::context::MAIL_CONTEXT;
use crate::modules::error::MailBridgeResult;
use crate::modules::imap::executor::ImapExecutor;
use crate::modules::mailbox::resolver::FolderRole;
use crate::modules::message::append::{archive, ArchiveOutcome};
use crate::modules::message::{fetch_raw, provenance};
use crate::modules::settings::cli::SETTINGS;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Tri-state result of a synthetic move. Never a silent no-op: the caller
/// always learns whether the message moved and where, or why it did not.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum MoveOutcome {
    Moved { moved: bool, target: String },
    NotMoved { moved: bool, reason: MoveFailure },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveFailure {
    /// The UID is gone from the source mailbox; a normal race outcome.
    NotFound,
    /// No destination mailbox could be opened or created. The source
    /// message is untouched.
    NoTrash,
    /// The copy into the destination did not confirm. The source message
    /// is untouched.
    AppendFailed,
}

impl MoveOutcome {
    pub fn moved(target: String) -> Self {
        MoveOutcome::Moved {
            moved: true,
            target,
        }
    }

    pub fn not_moved(reason: MoveFailure) -> Self {
        MoveOutcome::NotMoved {
            moved: false,
            reason,
        }
    }
}

/// Move a message into a Trash-like mailbox.
///
/// IMAP has no move primitive this can rely on, so the move is
/// synthesized: read the raw bytes, stamp them with provenance headers,
/// append them to a resolved Trash mailbox, and only after the append has
/// confirmed, delete the original. Each early exit leaves the source
/// exactly as it was; a failure after the append leaves a duplicate,
/// which is acceptable where losing the only copy is not.
pub async fn move_to_trash(
    credentials: &MailCredentials,
    mailbox: &str,
    uid: u32,
) -> MailBridgeResult<MoveOutcome> {
    let executor = MAIL_CONTEXT.imap(credentials).await?;
    let encoded_source = encode_mailbox_name!(mailbox);

    let Some(raw) = fetch_raw(&executor, &encoded_source, uid).await? else {
        return Ok(MoveOutcome::not_moved(MoveFailure::NotFound));
    };

    let stamped = provenance::stamp(&raw, mailbox, Utc::now());
    match archive(&executor, &stamped, &FolderRole::Trash.candidates(), None).await {
        Ok(ArchiveOutcome::Stored { target }) => {
            info!(source = mailbox, target = target.as_str(), uid, "Trashed message");
            expunge_source(&executor, &encoded_source, uid, &target).await;
            Ok(MoveOutcome::moved(target))
        }
        Ok(ArchiveOutcome::Skipped { .. }) => Ok(MoveOutcome::not_moved(MoveFailure::NoTrash)),
        Err(error) => {
            warn!(
                source = mailbox,
                uid, "Append into trash failed; source message left untouched: {error:#?}"
            );
            Ok(MoveOutcome::not_moved(MoveFailure::AppendFailed))
        }
    }
}

/// Put a trashed message back where it came from.
///
/// The mirror state machine: read the raw bytes from Trash, recover the
/// origin from `X-ORIGINAL-MAILBOX` (falling back to the default inbox
/// when the header is absent), strip both provenance headers, append the
/// sanitized bytes to the target, and only then delete the Trash copy.
/// If the origin can be neither opened nor created, the restore lands in
/// the default inbox rather than failing.
pub async fn restore(
    credentials: &MailCredentials,
    trash_mailbox: &str,
    uid: u32,
) -> MailBridgeResult<MoveOutcome> {
    let executor = MAIL_CONTEXT.imap(credentials).await?;
    let encoded_trash = encode_mailbox_name!(trash_mailbox);

    let Some(raw) = fetch_raw(&executor, &encoded_trash, uid).await? else {
        return Ok(MoveOutcome::not_moved(MoveFailure::NotFound));
    };

    let default_inbox = SETTINGS.mailbridge_default_inbox.clone();
    let origin = match provenance::original_mailbox(&raw) {
        Some(origin) => origin,
        None => {
            info!(
                trash = trash_mailbox,
                uid, "No origin header on trashed message; restoring to the default inbox"
            );
            default_inbox.clone()
        }
    };
    let sanitized = provenance::strip(&raw);

    let mut attempts: Vec<String> = vec![origin];
    if attempts[0] != default_inbox {
        attempts.push(default_inbox);
    }

    let mut target = None;
    for attempt in attempts {
        match archive(&executor, &sanitized, &[attempt.clone()], None).await {
            Ok(ArchiveOutcome::Stored { target: stored }) => {
                target = Some(stored);
                break;
            }
            Ok(ArchiveOutcome::Skipped { .. }) => continue,
            Err(error) => {
                warn!(
                    trash = trash_mailbox,
                    uid,
                    target = attempt.as_str(),
                    "Append during restore failed; trash copy left untouched: {error:#?}"
                );
                return Ok(MoveOutcome::not_moved(MoveFailure::AppendFailed));
            }
        }
    }

    match target {
        Some(target) => {
            info!(
                trash = trash_mailbox,
                target = target.as_str(),
                uid,
                "Restored message"
            );
            expunge_source(&executor, &encoded_trash, uid, &target).await;
            Ok(MoveOutcome::moved(target))
        }
        None => Ok(MoveOutcome::not_moved(MoveFailure::NoTrash)),
    }
}

/// Delete-and-expunge of the now-duplicated source. Failures are
/// swallowed: the message is already safe in `target`, and a leftover
/// duplicate beats surfacing an error after the real work succeeded.
async fn expunge_source(executor: &ImapExecutor, encoded_mailbox: &str, uid: u32, target: &str) {
    if let Err(error) = executor
        .uid_mark_deleted(&uid.to_string(), encoded_mailbox)
        .await
    {
        warn!(
            uid,
            target,
            "Source cleanup failed after a confirmed copy; leaving duplicate: {error:#?}"
        );
        return;
    }
    if let Err(error) = executor.expunge_mailbox(encoded_mailbox).await {
        warn!(
            uid,
            target,
            "Expunge failed after a confirmed copy; leaving duplicate: {error:#?}"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcomes_serialize_to_the_tri_state_shape() {
        let moved = serde_json::to_value(&MoveOutcome::moved("Trash".into())).unwrap();
        assert_eq!(moved["moved"], true);
        assert_eq!(moved["target"], "Trash");

        for (reason, expected) in [
            (MoveFailure::NotFound, "not_found"),
            (MoveFailure::NoTrash, "no_trash"),
            (MoveFailure::AppendFailed, "append_failed"),
        ] {
            let not_moved = serde_json::to_value(&MoveOutcome::not_moved(reason)).unwrap();
            assert_eq!(not_moved["moved"], false);
            assert_eq!(not_moved["reason"], expected);
        }
    }
}
