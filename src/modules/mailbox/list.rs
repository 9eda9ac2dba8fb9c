use crate::encode_mailbox_name;
use crate::modules::account::MailCredentials;
use crate::modules::context::MAIL_CONTEXT;
use crate::modules::error::MailBridgeResult;
use crate::modules::mailbox::MailBox;
use tracing::warn;

/// Enumerate every selectable mailbox with its counts. A mailbox that
/// fails EXAMINE is still listed, just without counts, so one broken
/// folder cannot empty the folder pane.
pub async fn list_mailboxes(credentials: &MailCredentials) -> MailBridgeResult<Vec<MailBox>> {
    let executor = MAIL_CONTEXT.imap(credentials).await?;
    let names = executor.list_all_mailboxes().await?;

    let mut mailboxes = Vec::with_capacity(names.len());
    for name in &names {
        let mut mailbox: MailBox = name.into();
        if !mailbox.is_selectable() {
            continue;
        }
        match executor
            .examine_mailbox(&encode_mailbox_name!(&mailbox.name))
            .await
        {
            Ok(status) => {
                mailbox.exists = status.exists;
                mailbox.unseen = status.unseen;
                mailbox.uid_next = status.uid_next;
                mailbox.uid_validity = status.uid_validity;
            }
            Err(error) => {
                warn!(
                    mailbox = mailbox.name.as_str(),
                    "Skipping status for mailbox that failed EXAMINE: {error:#?}"
                );
            }
        }
        mailboxes.push(mailbox);
    }

    Ok(mailboxes)
}
