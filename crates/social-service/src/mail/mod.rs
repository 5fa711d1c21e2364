//! Outgoing mail
//!
//! [`SmtpMailer`] talks to a real relay. Without SMTP settings the app runs
//! with [`LogMailer`], which only writes the message to the log.

mod log;
mod smtp;
mod templates;

use async_trait::async_trait;

pub use self::log::LogMailer;
pub use smtp::SmtpMailer;
pub use templates::password_reset_email;

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("invalid address: {0}")]
    Address(String),

    #[error("failed to build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: Option<String>,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError>;
}
