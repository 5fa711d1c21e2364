use async_trait::async_trait;
use tracing::info;

use super::{MailError, Mailer, OutgoingEmail};

/// Development mailer: nothing leaves the process
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        info!(to = %email.to, subject = %email.subject, body = %email.text, "mail not sent (no SMTP configured)");
        Ok(())
    }
}
