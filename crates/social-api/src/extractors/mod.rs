//! Axum extractors for request handling
//!
//! Session authentication, validated bodies and typed path parameters.

mod account_form;
mod auth;
mod path;
mod validated;

pub use account_form::AccountForm;
pub use auth::{AuthUser, OptionalAuthUser};
pub use path::{GuildIdPath, GuildMemberPath, MemberIdPath, SnowflakePath};
pub use validated::ValidatedJson;
