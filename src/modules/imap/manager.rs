// Copyright © 2025 mailbridge.dev
// Licensed under Mailbridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::account::MailCredentials;
use crate::modules::error::MailBridgeResult;
use crate::modules::imap::client::Client;
use crate::modules::imap::session::SessionStream;
use crate::modules::settings::cli::SETTINGS;
use async_imap::Session;
use tracing::error;

/// Dials and authenticates IMAP sessions for one credential pair. The
/// server coordinates come from deployment settings; the username and
/// password arrive with the request and are held only by this manager.
#[derive(Debug)]
pub struct ImapConnectionManager {
    pub credentials: MailCredentials,
}

impl ImapConnectionManager {
    pub fn new(credentials: MailCredentials) -> Self {
        Self { credentials }
    }

    async fn create_client(&self) -> MailBridgeResult<Client> {
        Client::connection(
            &SETTINGS.mailbridge_imap_host,
            SETTINGS.mailbridge_imap_encryption.into(),
            SETTINGS.mailbridge_imap_port,
        )
        .await
    }

    pub async fn build(&self) -> MailBridgeResult<Session<Box<dyn SessionStream>>> {
        let client = match self.create_client().await {
            Ok(client) => client,
            Err(error) => {
                error!(
                    "Failed to create IMAP client for {}: {:#?}",
                    &self.credentials.username, error
                );
                return Err(error);
            }
        };

        match client
            .login(&self.credentials.username, &self.credentials.password)
            .await
        {
            Ok(session) => Ok(session),
            Err(error) => {
                error!(
                    "Failed to authenticate IMAP session for {}: {:#?}",
                    &self.credentials.username, error
                );
                Err(error)
            }
        }
    }
}
