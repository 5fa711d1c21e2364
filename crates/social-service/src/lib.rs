//! # social-service
//!
//! Application layer: request/response DTOs, the account, friend and guild
//! services, outgoing mail and avatar storage.

pub mod dto;
pub mod mail;
pub mod services;
pub mod storage;

#[cfg(test)]
mod testing;

pub use mail::{LogMailer, MailError, Mailer, OutgoingEmail, SmtpMailer};
pub use services::{
    AccountService, FriendService, GuildService, ServiceContext, ServiceContextBuilder,
    ResetTokens, ServiceError, ServiceResult, ServiceSettings, SessionRevoker,
};
pub use storage::{FileStorage, ImageUpload, LocalFileStorage, StorageError};
