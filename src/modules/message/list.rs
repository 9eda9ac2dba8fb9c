// Copyright © 2025 mailbridge.dev
// Licensed under Mailbridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::encode_mailbox_name;
use crate::modules::account::MailCredentials;
use crate::modules::context::MAIL_CONTEXT;
use crate::modules::envelope::{summarize, MessageHeaderSummary};
use crate::modules::error::code::ErrorCode;
use crate::modules::error::MailBridgeResult;
use crate::modules::imap::executor::ImapExecutor;
use crate::modules::mailbox::{resolver, MailBox};
use crate::raise_error;
use futures::StreamExt;
use itertools::Itertools;
use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

/// Hard cap on candidate messages fetched by a cross-mailbox search.
const SEARCH_CANDIDATE_CAP: usize = 200;

/// How many candidate fetches run at once during the search fan-out.
const SEARCH_FETCH_CONCURRENCY: usize = 8;

static HEADER_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9-]*$").unwrap());

/// A structured search criterion, rendered into proper IMAP SEARCH syntax
/// with quoting. Building commands from typed parts (rather than pasting
/// caller strings) is what guarantees the server sees a well-formed
/// structured search.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SearchCriteria<'a> {
    Header { field: &'a str, value: &'a str },
    Body(&'a str),
}

impl SearchCriteria<'_> {
    pub fn render(&self) -> MailBridgeResult<String> {
        match self {
            SearchCriteria::Header { field, value } => {
                if !HEADER_FIELD.is_match(field) {
                    return Err(raise_error!(
                        format!("'{field}' is not a valid header field name"),
                        ErrorCode::InvalidParameter
                    ));
                }
                Ok(format!("HEADER {} {}", field, quote(value)))
            }
            SearchCriteria::Body(value) => Ok(format!("BODY {}", quote(value))),
        }
    }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// List one mailbox. The requested name is looked up leniently (exact,
/// then the case-insensitive flattening match); a name that resolves to
/// nothing yields an empty listing rather than an error.
pub async fn list_messages(
    credentials: &MailCredentials,
    mailbox: &str,
) -> MailBridgeResult<Vec<MessageHeaderSummary>> {
    let executor = MAIL_CONTEXT.imap(credentials).await?;
    let Some(actual) = resolver::locate(&executor, mailbox).await? else {
        warn!(mailbox, "Requested mailbox matched nothing; returning an empty listing");
        return Ok(Vec::new());
    };
    list_in_mailbox(&executor, &actual).await
}

/// List every selectable mailbox. A mailbox that errors is logged and
/// skipped so one broken folder cannot abort the whole listing.
pub async fn list_all_messages(
    credentials: &MailCredentials,
) -> MailBridgeResult<Vec<MessageHeaderSummary>> {
    let executor = MAIL_CONTEXT.imap(credentials).await?;
    let names = executor.list_all_mailboxes().await?;

    let mut all = Vec::new();
    for name in &names {
        let mailbox: MailBox = name.into();
        if !mailbox.is_selectable() {
            continue;
        }
        match list_in_mailbox(&executor, &mailbox.name).await {
            Ok(mut summaries) => all.append(&mut summaries),
            Err(error) => {
                warn!(
                    mailbox = mailbox.name.as_str(),
                    "Skipping mailbox that failed to list: {error:#?}"
                );
            }
        }
    }
    Ok(all)
}

async fn list_in_mailbox(
    executor: &ImapExecutor,
    mailbox: &str,
) -> MailBridgeResult<Vec<MessageHeaderSummary>> {
    let fetches = executor
        .fetch_all_summaries(&encode_mailbox_name!(mailbox))
        .await?;
    Ok(fetches
        .iter()
        .filter_map(|fetch| summarize(fetch, mailbox))
        .collect())
}

/// Search one mailbox by a single header field. Any failure is treated as
/// "no matches": a search box that errors out is worse than one that
/// comes back empty.
pub async fn search_by_header(
    credentials: &MailCredentials,
    mailbox: &str,
    field: &str,
    value: &str,
) -> Vec<MessageHeaderSummary> {
    match search_by_header_impl(credentials, mailbox, field, value).await {
        Ok(summaries) => summaries,
        Err(error) => {
            warn!(mailbox, field, "Header search failed; returning no matches: {error:#?}");
            Vec::new()
        }
    }
}

async fn search_by_header_impl(
    credentials: &MailCredentials,
    mailbox: &str,
    field: &str,
    value: &str,
) -> MailBridgeResult<Vec<MessageHeaderSummary>> {
    let executor = MAIL_CONTEXT.imap(credentials).await?;
    let Some(actual) = resolver::locate(&executor, mailbox).await? else {
        return Ok(Vec::new());
    };
    let encoded = encode_mailbox_name!(&actual);

    let query = SearchCriteria::Header { field, value }.render()?;
    let uids = executor.uid_search(&encoded, &query).await?;
    if uids.is_empty() {
        return Ok(Vec::new());
    }

    let uid_set = uids.iter().sorted().join(",");
    let fetches = executor.uid_fetch_summaries(&uid_set, &encoded).await?;
    Ok(dedupe(
        fetches
            .iter()
            .filter_map(|fetch| summarize(fetch, &actual))
            .collect(),
    ))
}

/// Substring search across every mailbox: subject and sender headers plus
/// message bodies. Candidate messages are fetched with bounded
/// concurrency and joined before returning; ordering across mailboxes is
/// not guaranteed, but the result set is deduplicated by (mailbox, uid).
pub async fn search_messages(
    credentials: &MailCredentials,
    query: &str,
) -> MailBridgeResult<Vec<MessageHeaderSummary>> {
    let executor = MAIL_CONTEXT.imap(credentials).await?;
    let names = executor.list_all_mailboxes().await?;

    let criteria = [
        SearchCriteria::Header {
            field: "Subject",
            value: query,
        }
        .render()?,
        SearchCriteria::Header {
            field: "From",
            value: query,
        }
        .render()?,
        SearchCriteria::Body(query).render()?,
    ];

    let mut candidates: Vec<(String, u32)> = Vec::new();
    for name in &names {
        let mailbox: MailBox = name.into();
        if !mailbox.is_selectable() {
            continue;
        }
        let encoded = encode_mailbox_name!(&mailbox.name);
        let mut uids = std::collections::HashSet::new();
        for criterion in &criteria {
            match executor.uid_search(&encoded, criterion).await {
                Ok(matched) => uids.extend(matched),
                Err(error) => {
                    warn!(
                        mailbox = mailbox.name.as_str(),
                        "Skipping search in mailbox that errored: {error:#?}"
                    );
                }
            }
        }
        candidates.extend(uids.into_iter().map(|uid| (mailbox.name.clone(), uid)));
    }

    if candidates.len() > SEARCH_CANDIDATE_CAP {
        warn!(
            dropped = candidates.len() - SEARCH_CANDIDATE_CAP,
            "Search matched more candidates than the fetch cap; truncating"
        );
        candidates.truncate(SEARCH_CANDIDATE_CAP);
    }

    let summaries: Vec<Option<MessageHeaderSummary>> =
        futures::stream::iter(candidates.into_iter().map(|(mailbox, uid)| {
            let executor = executor.clone();
            async move {
                let encoded = encode_mailbox_name!(&mailbox);
                match executor
                    .uid_fetch_summaries(&uid.to_string(), &encoded)
                    .await
                {
                    Ok(fetches) => fetches.iter().find_map(|fetch| summarize(fetch, &mailbox)),
                    Err(error) => {
                        warn!(
                            mailbox = mailbox.as_str(),
                            uid, "Dropping search candidate that failed to fetch: {error:#?}"
                        );
                        None
                    }
                }
            }
        }))
        .buffer_unordered(SEARCH_FETCH_CONCURRENCY)
        .collect()
        .await;

    Ok(dedupe(summaries.into_iter().flatten().collect()))
}

/// Collapse duplicate (mailbox, uid) entries, keeping first occurrence.
fn dedupe(summaries: Vec<MessageHeaderSummary>) -> Vec<MessageHeaderSummary> {
    summaries
        .into_iter()
        .unique_by(|summary| (summary.mailbox.clone(), summary.uid))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(mailbox: &str, uid: u32) -> MessageHeaderSummary {
        MessageHeaderSummary {
            uid,
            mailbox: mailbox.into(),
            ..Default::default()
        }
    }

    #[test]
    fn header_criteria_render_quoted_search_commands() {
        let rendered = SearchCriteria::Header {
            field: "Subject",
            value: "quarterly \"numbers\"",
        }
        .render()
        .unwrap();
        assert_eq!(rendered, r#"HEADER Subject "quarterly \"numbers\"""#);

        let rendered = SearchCriteria::Body(r"c:\temp").render().unwrap();
        assert_eq!(rendered, r#"BODY "c:\\temp""#);
    }

    #[test]
    fn header_criteria_reject_malformed_field_names() {
        assert!(SearchCriteria::Header {
            field: "X-Loop",
            value: "x",
        }
        .render()
        .is_ok());
        for bad in ["", "Sub ject", "X:evil", "\"quoted\""] {
            assert!(
                SearchCriteria::Header {
                    field: bad,
                    value: "x",
                }
                .render()
                .is_err(),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn dedupe_collapses_composite_identifier_duplicates() {
        let deduped = dedupe(vec![
            summary("INBOX", 1),
            summary("INBOX", 2),
            summary("INBOX", 1),
            summary("Archive", 1),
        ]);
        assert_eq!(deduped.len(), 3);
        let pairs: Vec<(String, u32)> = deduped
            .iter()
            .map(|s| (s.mailbox.clone(), s.uid))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("INBOX".into(), 1),
                ("INBOX".into(), 2),
                ("Archive".into(), 1),
            ]
        );
    }
}
