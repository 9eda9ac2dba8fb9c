// Copyright © 2025 mailbridge.dev
// Licensed under Mailbridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::encode_mailbox_name;
use crate::modules::error::code::ErrorCode;
use crate::modules::error::MailBridgeResult;
use crate::modules::imap::executor::ImapExecutor;
use crate::raise_error;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Logical mailbox roles the client needs regardless of what the server
/// calls them.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum FolderRole {
    Sent,
    Drafts,
    Trash,
}

impl FolderRole {
    /// Physical names observed for this role across server dialects, in
    /// preference order. Kept as data so a new dialect is one more entry,
    /// not new control flow.
    pub const fn base_candidates(&self) -> &'static [&'static str] {
        match self {
            FolderRole::Sent => &["Sent", "Sent Items", "Sent Messages"],
            FolderRole::Drafts => &["Drafts", "Draft"],
            FolderRole::Trash => &["Trash", "Deleted Items", "Deleted", "Bin"],
        }
    }

    /// The full candidate list: every base name plus its `INBOX.`-prefixed
    /// variant for servers that root user mailboxes under INBOX.
    pub fn candidates(&self) -> Vec<String> {
        let base = self.base_candidates();
        let mut candidates: Vec<String> = base.iter().map(|name| name.to_string()).collect();
        candidates.extend(base.iter().map(|name| format!("INBOX.{}", name)));
        candidates
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct ResolvedFolder {
    pub name: String,
    pub opened: bool,
    pub created: bool,
}

/// Find or create a writable mailbox from an ordered candidate list.
///
/// Candidates are tried verbatim, case-sensitively: creation with a
/// case-folded name would scatter near-duplicate folders across servers
/// that treat names case-sensitively. Returns `ResourceNotFound` when no
/// candidate opens and the first cannot be created; callers owning a
/// destructive follow-up step must leave the source untouched in that
/// case.
pub async fn resolve(
    executor: &ImapExecutor,
    candidates: &[String],
) -> MailBridgeResult<ResolvedFolder> {
    for candidate in candidates {
        if executor
            .select_mailbox(&encode_mailbox_name!(candidate))
            .await
            .is_ok()
        {
            debug!(mailbox = candidate.as_str(), "Resolved writable mailbox");
            return Ok(ResolvedFolder {
                name: candidate.clone(),
                opened: true,
                created: false,
            });
        }
    }

    let first = candidates.first().ok_or_else(|| {
        raise_error!(
            "Mailbox candidate list cannot be empty".into(),
            ErrorCode::InvalidParameter
        )
    })?;

    executor
        .create_mailbox(&encode_mailbox_name!(first))
        .await
        .map_err(|e| {
            raise_error!(
                format!("No candidate mailbox exists and creating '{first}' failed: {e}"),
                ErrorCode::ResourceNotFound
            )
        })?;
    executor
        .select_mailbox(&encode_mailbox_name!(first))
        .await
        .map_err(|e| {
            raise_error!(
                format!("Created mailbox '{first}' but could not open it: {e}"),
                ErrorCode::ResourceNotFound
            )
        })?;
    info!(mailbox = first.as_str(), "Created mailbox on demand");

    Ok(ResolvedFolder {
        name: first.clone(),
        opened: true,
        created: true,
    })
}

/// Read-path fallback lookup: flatten the mailbox tree and match the
/// requested name case-insensitively against each full path, its last
/// hierarchy segment, or its `INBOX.`-prefixed variant. Returns the
/// server's actual name so follow-up commands address the real mailbox.
pub async fn locate(executor: &ImapExecutor, requested: &str) -> MailBridgeResult<Option<String>> {
    let names = executor.list_all_mailboxes().await?;
    let flattened: Vec<(String, Option<String>)> = names
        .iter()
        .map(|name| {
            (
                crate::decode_mailbox_name!(name.name()),
                name.delimiter().map(|d| d.to_string()),
            )
        })
        .collect();
    Ok(match_mailbox(requested, &flattened))
}

/// Pure matching core of [`locate`], separated from the network round-trip.
fn match_mailbox(requested: &str, flattened: &[(String, Option<String>)]) -> Option<String> {
    // Exact match wins before any case folding.
    if let Some((name, _)) = flattened.iter().find(|(name, _)| name == requested) {
        return Some(name.clone());
    }

    let inbox_prefixed = format!("INBOX.{}", requested);
    for (name, delimiter) in flattened {
        if name.eq_ignore_ascii_case(requested) || name.eq_ignore_ascii_case(&inbox_prefixed) {
            return Some(name.clone());
        }
        let delimiter = delimiter.as_deref().unwrap_or(".");
        if let Some(last_segment) = name.rsplit(delimiter).next() {
            if last_segment.eq_ignore_ascii_case(requested) {
                return Some(name.clone());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(names: &[(&str, &str)]) -> Vec<(String, Option<String>)> {
        names
            .iter()
            .map(|(name, delim)| (name.to_string(), Some(delim.to_string())))
            .collect()
    }

    #[test]
    fn trash_candidates_cover_inbox_prefixed_variants_in_order() {
        let candidates = FolderRole::Trash.candidates();
        assert_eq!(
            candidates,
            vec![
                "Trash",
                "Deleted Items",
                "Deleted",
                "Bin",
                "INBOX.Trash",
                "INBOX.Deleted Items",
                "INBOX.Deleted",
                "INBOX.Bin",
            ]
        );
    }

    #[test]
    fn exact_name_is_preferred_over_case_variants() {
        let flattened = tree(&[("sent", "."), ("Sent", ".")]);
        assert_eq!(match_mailbox("Sent", &flattened), Some("Sent".into()));
    }

    #[test]
    fn full_path_matches_case_insensitively() {
        let flattened = tree(&[("INBOX", "."), ("Sent Items", ".")]);
        assert_eq!(
            match_mailbox("sent items", &flattened),
            Some("Sent Items".into())
        );
    }

    #[test]
    fn last_segment_matches_through_the_delimiter() {
        let flattened = tree(&[("INBOX", "."), ("INBOX.Archive.Old", ".")]);
        assert_eq!(
            match_mailbox("old", &flattened),
            Some("INBOX.Archive.Old".into())
        );

        let slashed = tree(&[("mail/Drafts", "/")]);
        assert_eq!(match_mailbox("drafts", &slashed), Some("mail/Drafts".into()));
    }

    #[test]
    fn inbox_prefixed_variant_matches() {
        let flattened = tree(&[("INBOX.Trash", ".")]);
        assert_eq!(match_mailbox("trash", &flattened), Some("INBOX.Trash".into()));
    }

    #[test]
    fn unknown_name_matches_nothing() {
        let flattened = tree(&[("INBOX", "."), ("Sent", ".")]);
        assert_eq!(match_mailbox("Junk", &flattened), None);
    }
}
