// Copyright © 2025 mailbridge.dev
// Licensed under Mailbridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::account::Encryption;
use clap::{Parser, ValueEnum};
use std::{path::PathBuf, sync::LazyLock};

#[cfg(not(test))]
pub static SETTINGS: LazyLock<Settings> = LazyLock::new(Settings::parse);

#[cfg(test)]
pub static SETTINGS: LazyLock<Settings> = LazyLock::new(Settings::new_for_test);

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum ImapEncryption {
    Ssl,
    Starttls,
    None,
}

impl From<ImapEncryption> for Encryption {
    fn from(value: ImapEncryption) -> Self {
        match value {
            ImapEncryption::Ssl => Encryption::Ssl,
            ImapEncryption::Starttls => Encryption::StartTls,
            ImapEncryption::None => Encryption::None,
        }
    }
}

#[derive(Debug, Parser)]
#[clap(
    name = "mailbridge",
    about = "Webmail backend bridge: Drafts/Sent/Trash semantics, move and restore,
    listing and search on top of a standard IMAP server.",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Settings {
    /// Hostname of the IMAP server every operation authenticates against.
    #[clap(long, env, help = "Set the IMAP server hostname")]
    pub mailbridge_imap_host: String,

    /// IMAP server port (default: 993)
    #[clap(long, default_value = "993", env, help = "Set the IMAP server port")]
    pub mailbridge_imap_port: u16,

    /// Transport security for IMAP connections (default: ssl)
    #[clap(
        long,
        value_enum,
        default_value = "ssl",
        env,
        help = "Set the IMAP transport security (ssl, starttls, none)"
    )]
    pub mailbridge_imap_encryption: ImapEncryption,

    /// Mailbox used when a restored message carries no usable origin
    /// and as the last-resort restore target (default: "INBOX").
    #[clap(
        long,
        default_value = "INBOX",
        env,
        help = "Set the default inbox mailbox name"
    )]
    pub mailbridge_default_inbox: String,

    /// mailbridge log level (default: "info")
    #[clap(
        long,
        default_value = "info",
        env,
        help = "Set the log level for mailbridge"
    )]
    pub mailbridge_log_level: String,

    /// Whether to write logs to rolling files instead of stdout (default: false)
    #[clap(long, env, help = "Write logs to daily-rolling files")]
    pub mailbridge_log_to_file: bool,

    /// Directory for rolling log files (default: "./logs")
    #[clap(
        long,
        default_value = "./logs",
        env,
        help = "Set the directory for log files"
    )]
    pub mailbridge_log_dir: PathBuf,

    /// Maximum number of rolled server log files to keep (default: 7)
    #[clap(
        long,
        default_value = "7",
        env,
        help = "Set the maximum number of rotated log files"
    )]
    pub mailbridge_max_log_files: usize,

    /// Whether log output uses ANSI colors (default: false)
    #[clap(long, env, help = "Enable ANSI colors in log output")]
    pub mailbridge_ansi_logs: bool,
}

impl Settings {
    #[cfg(test)]
    pub fn new_for_test() -> Self {
        Self {
            mailbridge_imap_host: "imap.example.com".into(),
            mailbridge_imap_port: 993,
            mailbridge_imap_encryption: ImapEncryption::Ssl,
            mailbridge_default_inbox: "INBOX".into(),
            mailbridge_log_level: "info".into(),
            mailbridge_log_to_file: false,
            mailbridge_log_dir: std::env::temp_dir(),
            mailbridge_max_log_files: 7,
            mailbridge_ansi_logs: false,
        }
    }
}
