// Copyright © 2025 mailbridge.dev
// Licensed under Mailbridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::decode_mailbox_name;
use async_imap::types::{Name, NameAttribute};
use serde::{Deserialize, Serialize};

pub mod list;
pub mod resolver;

/// A mailbox as the folder pane renders it: decoded name, hierarchy
/// delimiter, attributes, and the counts gathered from EXAMINE.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct MailBox {
    /// The decoded, human-readable name (e.g., "INBOX", "Sent Items").
    pub name: String,
    /// Hierarchy delimiter reported by the server (e.g., "/" or ".").
    pub delimiter: Option<String>,
    pub attributes: Vec<Attribute>,
    /// Number of messages in the mailbox.
    pub exists: u32,
    /// Number of messages without the `\Seen` flag, when reported.
    pub unseen: Option<u32>,
    pub uid_next: Option<u32>,
    pub uid_validity: Option<u32>,
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct Attribute {
    pub attr: AttributeEnum,
    /// Extension payload when `attr` is `Extension`.
    pub extension: Option<String>,
}

impl Attribute {
    pub fn new(attr: AttributeEnum, extension: Option<String>) -> Self {
        Self { attr, extension }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum AttributeEnum {
    NoInferiors,
    NoSelect,
    Marked,
    Unmarked,
    All,
    Archive,
    Drafts,
    Flagged,
    Junk,
    Sent,
    Trash,
    Extension,
    Unknown,
}

impl MailBox {
    pub fn has_attr(&self, wanted: AttributeEnum) -> bool {
        self.attributes.iter().any(|a| a.attr == wanted)
    }

    pub fn is_selectable(&self) -> bool {
        !self.has_attr(AttributeEnum::NoSelect)
    }
}

impl From<&Name> for MailBox {
    fn from(value: &Name) -> Self {
        let name = decode_mailbox_name!(value.name().to_string());
        let delimiter = value.delimiter().map(|f| f.to_owned());
        let attributes: Vec<Attribute> = value.attributes().iter().map(|na| na.into()).collect();
        // Counts are filled in by the EXAMINE pass in list::list_mailboxes.
        MailBox {
            name,
            delimiter,
            attributes,
            ..Default::default()
        }
    }
}

impl From<&NameAttribute<'_>> for Attribute {
    fn from(value: &NameAttribute) -> Self {
        match value {
            NameAttribute::NoInferiors => Attribute::new(AttributeEnum::NoInferiors, None),
            NameAttribute::NoSelect => Attribute::new(AttributeEnum::NoSelect, None),
            NameAttribute::Marked => Attribute::new(AttributeEnum::Marked, None),
            NameAttribute::Unmarked => Attribute::new(AttributeEnum::Unmarked, None),
            NameAttribute::All => Attribute::new(AttributeEnum::All, None),
            NameAttribute::Archive => Attribute::new(AttributeEnum::Archive, None),
            NameAttribute::Drafts => Attribute::new(AttributeEnum::Drafts, None),
            NameAttribute::Flagged => Attribute::new(AttributeEnum::Flagged, None),
            NameAttribute::Junk => Attribute::new(AttributeEnum::Junk, None),
            NameAttribute::Sent => Attribute::new(AttributeEnum::Sent, None),
            NameAttribute::Trash => Attribute::new(AttributeEnum::Trash, None),
            NameAttribute::Extension(s) => {
                Attribute::new(AttributeEnum::Extension, Some(s.to_string()))
            }
            _ => Attribute::new(AttributeEnum::Unknown, None),
        }
    }
}
