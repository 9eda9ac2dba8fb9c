// Copyright © 2025 mailbridge.dev
// Licensed under Mailbridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

use crate::calculate_hash;
use crate::modules::error::MailBridgeResult;
use crate::validate_email;

/// Transport security for the IMAP connection.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Encryption {
    #[default]
    Ssl,
    StartTls,
    None,
}

/// An IMAP username/password pair, supplied by the caller on every
/// operation. The mail server itself is the only credential authority:
/// an attempted login is the sole check (there is no local account store).
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct MailCredentials {
    pub username: String,
    pub password: String,
}

impl MailCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> MailBridgeResult<()> {
        validate_email!(&self.username)
    }

    /// Stable key for the per-credential session pool. The password takes
    /// part so a changed password yields a fresh pool instead of recycling
    /// sessions that would now fail NOOP validation.
    pub fn pool_key(&self) -> u64 {
        calculate_hash!(&format!("{}\u{0}{}", self.username, self.password))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_key_tracks_password_changes() {
        let a = MailCredentials::new("alice@example.com", "hunter2");
        let b = MailCredentials::new("alice@example.com", "hunter3");
        assert_ne!(a.pool_key(), b.pool_key());
        assert_eq!(a.pool_key(), a.clone().pool_key());
    }

    #[test]
    fn validate_requires_a_wellformed_address() {
        assert!(MailCredentials::new("alice@example.com", "pw")
            .validate()
            .is_ok());
        assert!(MailCredentials::new("alice", "pw").validate().is_err());
    }
}
