//! Domain entities
//!
//! Every entity carries a snowflake `id` (or a composite key for join
//! entities) plus `created_at` / `updated_at` stamps.

mod ban;
mod friend_request;
mod guild;
mod user;

pub use ban::Ban;
pub use friend_request::{FriendRequest, PendingRequest, RequestDirection};
pub use guild::Guild;
pub use user::User;
