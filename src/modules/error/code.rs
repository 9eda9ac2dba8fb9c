// Copyright © 2025 mailbridge.dev
// Licensed under Mailbridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use http::StatusCode;
use serde::{Deserialize, Serialize};

/// Stable numeric error codes exposed to the embedding API layer.
///
/// Ranges are grouped by origin: client-side input problems, resource
/// lookups, network transport, and mail-service failures.
#[derive(Copy, Clone, Debug, Deserialize, Serialize, Eq, PartialEq)]
#[repr(u32)]
pub enum ErrorCode {
    // Client-side errors (10000–10999)
    InvalidParameter = 10000,

    // Resource errors (30000–30999)
    ResourceNotFound = 30000,

    // Network connection errors (40000–40999)
    NetworkError = 40000,
    ConnectionTimeout = 40010,
    ConnectionPoolTimeout = 40020,

    // Mail service errors (50000–50999)
    ImapCommandFailed = 50000,
    ImapAuthenticationFailed = 50010,
    ImapUnexpectedResult = 50020,

    // Internal system errors (70000–70999)
    InternalError = 70000,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::InvalidParameter => StatusCode::BAD_REQUEST,
            ErrorCode::ResourceNotFound => StatusCode::NOT_FOUND,
            ErrorCode::ImapAuthenticationFailed => StatusCode::UNAUTHORIZED,
            ErrorCode::NetworkError
            | ErrorCode::ImapCommandFailed
            | ErrorCode::ImapUnexpectedResult => StatusCode::BAD_GATEWAY,
            ErrorCode::ConnectionTimeout | ErrorCode::ConnectionPoolTimeout => {
                StatusCode::GATEWAY_TIMEOUT
            }
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
