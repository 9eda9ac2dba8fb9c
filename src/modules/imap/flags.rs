// Copyright © 2025 mailbridge.dev
// Licensed under Mailbridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::error::code::ErrorCode;
use crate::modules::error::MailBridgeResult;
use crate::raise_error;
use async_imap::types::Flag;
use serde::{Deserialize, Serialize};

/// A server-maintained message flag, either one of the reserved system
/// flags or a server-specific keyword.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct MessageFlag {
    pub flag: EmailFlag,
    /// Only set for `EmailFlag::Custom`.
    pub custom: Option<String>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum EmailFlag {
    Seen,
    Answered,
    Flagged,
    Deleted,
    Draft,
    Recent,
    MayCreate,
    Custom,
}

impl MessageFlag {
    pub fn new(flag: EmailFlag, custom: Option<String>) -> Self {
        Self { flag, custom }
    }

    pub fn to_imap_string(&self) -> MailBridgeResult<String> {
        match self.flag {
            EmailFlag::Custom => {
                let custom = self.custom.as_ref().ok_or_else(|| {
                    raise_error!(
                        "Custom flag requires a custom value".into(),
                        ErrorCode::InvalidParameter
                    )
                })?;
                Ok(custom.clone())
            }
            EmailFlag::Seen => Ok("\\Seen".into()),
            EmailFlag::Answered => Ok("\\Answered".into()),
            EmailFlag::Flagged => Ok("\\Flagged".into()),
            EmailFlag::Deleted => Ok("\\Deleted".into()),
            EmailFlag::Draft => Ok("\\Draft".into()),
            EmailFlag::Recent => Ok("\\Recent".into()),
            EmailFlag::MayCreate => Ok("\\MayCreate".into()),
        }
    }
}

impl<'a> From<Flag<'a>> for MessageFlag {
    fn from(value: Flag<'a>) -> Self {
        match value {
            Flag::Seen => MessageFlag::new(EmailFlag::Seen, None),
            Flag::Answered => MessageFlag::new(EmailFlag::Answered, None),
            Flag::Flagged => MessageFlag::new(EmailFlag::Flagged, None),
            Flag::Deleted => MessageFlag::new(EmailFlag::Deleted, None),
            Flag::Draft => MessageFlag::new(EmailFlag::Draft, None),
            Flag::Recent => MessageFlag::new(EmailFlag::Recent, None),
            Flag::MayCreate => MessageFlag::new(EmailFlag::MayCreate, None),
            Flag::Custom(s) => MessageFlag::new(EmailFlag::Custom, Some(s.to_string())),
        }
    }
}

impl std::fmt::Display for MessageFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.custom {
            Some(custom) => write!(f, "{}", custom),
            None => write!(f, "\\{:?}", self.flag),
        }
    }
}

/// The single normalization point for flag interpretation: servers differ
/// in the casing they report, so every comparison against the reserved
/// `\Seen` flag goes through here.
pub fn is_seen<'a>(flags: impl IntoIterator<Item = &'a str>) -> bool {
    flags
        .into_iter()
        .any(|flag| flag.trim_start_matches('\\').eq_ignore_ascii_case("Seen"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_seen_matches_any_case_variant() {
        for variant in ["\\Seen", "\\seen", "\\SEEN", "Seen", "sEeN"] {
            assert!(is_seen([variant]), "{variant} should count as seen");
        }
    }

    #[test]
    fn is_seen_false_when_absent() {
        assert!(!is_seen([]));
        assert!(!is_seen(["\\Answered", "\\Flagged", "Junk"]));
        assert!(!is_seen(["\\Unseen"]));
    }

    #[test]
    fn reserved_flags_render_imap_syntax() {
        assert_eq!(
            MessageFlag::new(EmailFlag::Deleted, None)
                .to_imap_string()
                .unwrap(),
            "\\Deleted"
        );
        assert_eq!(
            MessageFlag::new(EmailFlag::Custom, Some("Junk".into()))
                .to_imap_string()
                .unwrap(),
            "Junk"
        );
        assert!(MessageFlag::new(EmailFlag::Custom, None)
            .to_imap_string()
            .is_err());
    }

    #[test]
    fn display_matches_wire_casing() {
        let flag: MessageFlag = Flag::Seen.into();
        assert_eq!(flag.to_string(), "\\Seen");
        let custom: MessageFlag = Flag::Custom("NonJunk".into()).into();
        assert_eq!(custom.to_string(), "NonJunk");
    }
}
