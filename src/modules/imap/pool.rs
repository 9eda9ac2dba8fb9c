use crate::modules::account::MailCredentials;
use crate::modules::error::code::ErrorCode;
use crate::modules::error::{MailBridgeError, MailBridgeResult};
use crate::modules::imap::{manager::ImapConnectionManager, session::SessionStream};
use crate::raise_error;
use async_imap::Session;
use bb8::Pool;
use std::time::Duration;

impl bb8::ManageConnection for ImapConnectionManager {
    type Connection = Session<Box<dyn SessionStream>>;

    type Error = MailBridgeError;

    async fn connect(&self) -> MailBridgeResult<Self::Connection> {
        self.build().await
    }

    // call this function before using the connection
    async fn is_valid(&self, conn: &mut Self::Connection) -> MailBridgeResult<()> {
        conn.noop()
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::ImapCommandFailed))
    }

    fn has_broken(&self, _: &mut Self::Connection) -> bool {
        false
    }
}

/// Scoped acquisition over per-credential sessions: a checked-out session
/// returns to the pool when its guard drops, on every exit path, and idle
/// sessions are evicted so server connection slots are not held open.
pub async fn build_imap_pool(
    credentials: MailCredentials,
) -> MailBridgeResult<Pool<ImapConnectionManager>> {
    let manager = ImapConnectionManager::new(credentials);
    let pool = Pool::builder()
        .connection_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(120))
        .retry_connection(true)
        .max_size(10)
        .test_on_check_out(true)
        .build(manager)
        .await?;

    Ok(pool)
}
