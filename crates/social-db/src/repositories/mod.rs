//! PostgreSQL implementations of the `social-core` repository traits

mod ban;
mod error;
mod friend;
mod guild;
mod user;

pub use ban::PgBanRepository;
pub use friend::PgFriendRepository;
pub use guild::PgGuildRepository;
pub use user::PgUserRepository;
