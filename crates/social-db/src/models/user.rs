//! User rows

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// `users` without the password hash, which is only read on its own
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub image: String,
    pub is_online: bool,
    pub last_seen: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user on the other side of a pending friend request
#[derive(Debug, Clone, FromRow)]
pub struct PendingRequestModel {
    #[sqlx(flatten)]
    pub user: UserModel,
    /// `incoming` or `outgoing`
    pub direction: String,
    pub requested_at: DateTime<Utc>,
}
