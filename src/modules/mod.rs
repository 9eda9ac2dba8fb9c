pub mod account;
pub mod context;
pub mod envelope;
pub mod error;
pub mod imap;
pub mod logger;
pub mod mailbox;
pub mod message;
pub mod settings;
pub mod utils;
