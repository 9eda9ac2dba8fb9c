// Copyright © 2025 mailbridge.dev
// Licensed under Mailbridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::raise_error;
use bb8::RunError;
use code::ErrorCode;
use snafu::{Location, Snafu};

pub mod code;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum MailBridgeError {
    #[snafu(display("{message}"))]
    Generic {
        message: String,
        #[snafu(implicit)]
        location: Location,
        code: ErrorCode,
    },
}

pub type MailBridgeResult<T, E = MailBridgeError> = std::result::Result<T, E>;

impl MailBridgeError {
    pub fn code(&self) -> ErrorCode {
        match self {
            MailBridgeError::Generic { code, .. } => *code,
        }
    }

    /// Whether this error denotes an absent named resource (mailbox or UID),
    /// which callers treat as a normal outcome rather than a transport fault.
    pub fn is_not_found(&self) -> bool {
        self.code() == ErrorCode::ResourceNotFound
    }
}

impl From<RunError<MailBridgeError>> for MailBridgeError {
    fn from(e: RunError<MailBridgeError>) -> Self {
        match e {
            RunError::User(e) => e,
            RunError::TimedOut => raise_error!(
                "Timed out while attempting to acquire a connection from the pool".into(),
                ErrorCode::ConnectionPoolTimeout
            ),
        }
    }
}
