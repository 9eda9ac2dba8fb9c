// Copyright © 2025 mailbridge.dev
// Licensed under Mailbridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::account::MailCredentials;
use crate::modules::error::code::ErrorCode;
use crate::modules::error::MailBridgeResult;
use crate::modules::imap::{executor::ImapExecutor, pool::build_imap_pool};
use crate::raise_error;
use dashmap::DashMap;
use std::sync::{Arc, LazyLock};
use tracing::info;

pub static MAIL_CONTEXT: LazyLock<MailClientContext> = LazyLock::new(MailClientContext::new);

/// Registry of per-credential IMAP executors. Each distinct
/// username/password pair gets its own pool; dropping an entry closes the
/// pooled sessions, so eviction doubles as logout.
pub struct MailClientContext {
    imap: DashMap<u64, Arc<ImapExecutor>>,
}

impl MailClientContext {
    pub fn new() -> Self {
        Self {
            imap: DashMap::new(),
        }
    }

    pub async fn imap(&self, credentials: &MailCredentials) -> MailBridgeResult<Arc<ImapExecutor>> {
        let key = credentials.pool_key();
        if let Some(executor) = self.imap.get(&key) {
            return Ok(executor.value().clone());
        }

        let pool = build_imap_pool(credentials.clone()).await?;
        let new_executor = Arc::new(ImapExecutor::new(pool));

        match self.imap.try_entry(key) {
            Some(dashmap::mapref::entry::Entry::Occupied(entry)) => Ok(entry.get().clone()),
            Some(dashmap::mapref::entry::Entry::Vacant(entry)) => {
                entry.insert(new_executor.clone());
                Ok(new_executor)
            }
            None => Err(raise_error!(
                "DashMap locked".into(),
                ErrorCode::InternalError
            )),
        }
    }

    pub fn evict(&self, credentials: &MailCredentials) {
        if self.imap.remove(&credentials.pool_key()).is_some() {
            info!(
                username = credentials.username.as_str(),
                "Closed IMAP pool for credentials"
            );
        }
    }
}

impl Default for MailClientContext {
    fn default() -> Self {
        Self::new()
    }
}
