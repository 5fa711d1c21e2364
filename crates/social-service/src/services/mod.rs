//! Business logic services
//!
//! Each service borrows the shared [`ServiceContext`] for the length of a
//! request.

pub mod account;
pub mod context;
pub mod error;
pub mod friend;
pub mod guild;
pub mod tokens;

pub use account::{gravatar_url, AccountService};
pub use context::{ServiceContext, ServiceContextBuilder, ServiceSettings};
pub use error::{ServiceError, ServiceResult};
pub use friend::FriendService;
pub use guild::GuildService;
pub use tokens::{ResetTokens, SessionRevoker};
