//! Mailbox-state emulation for a webmail backend.
//!
//! IMAP only knows how to append, flag, expunge, and copy; this crate
//! makes those primitives behave like a mail client. It discovers
//! Drafts/Sent/Trash mailboxes across server naming dialects (creating
//! them on demand), synthesizes move-to-trash and restore from
//! fetch + header-stamp + append + expunge with an append-before-delete
//! safety invariant, and provides listing and search over one or all
//! mailboxes.
//!
//! Every operation takes the caller's IMAP credentials; the mail server
//! itself is the only authentication authority. Sessions come from
//! per-credential pools and are returned on every exit path.

pub mod modules;

pub use modules::account::MailCredentials;
pub use modules::context::MAIL_CONTEXT;
pub use modules::envelope::MessageHeaderSummary;
pub use modules::error::{code::ErrorCode, MailBridgeError, MailBridgeResult};
pub use modules::logger::initialize_logging;
pub use modules::mailbox::list::list_mailboxes;
pub use modules::mailbox::resolver::{FolderRole, ResolvedFolder};
pub use modules::mailbox::MailBox;
pub use modules::message::append::{
    archive_sent_copy, archive_sent_raw, save_draft, ArchiveOutcome, SkipReason,
};
pub use modules::message::attachment::fetch_attachment;
pub use modules::message::codec::{AttachmentContent, AttachmentMeta, ComposeRequest};
pub use modules::message::delete::delete_message;
pub use modules::message::full::{fetch_message, MessageBody};
pub use modules::message::list::{
    list_all_messages, list_messages, search_by_header, search_messages,
};
pub use modules::message::trash::{move_to_trash, restore, MoveFailure, MoveOutcome};
