//! Repository traits - the data access the domain needs, implemented by the
//! PostgreSQL crate

use async_trait::async_trait;

use crate::entities::{Ban, FriendRequest, Guild, PendingRequest, User};
use crate::error::DomainError;
use crate::value_objects::{Relationship, Snowflake};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>>;

    /// Lookup by already-normalized email
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// Insert a user; a taken email yields `EmailAlreadyExists`
    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()>;

    /// Persist username, email and image
    async fn update(&self, user: &User) -> RepoResult<()>;

    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>>;

    async fn update_password(&self, id: Snowflake, password_hash: &str) -> RepoResult<()>;

    /// Persist `is_online` and `last_seen`
    async fn update_presence(&self, user: &User) -> RepoResult<()>;
}

// ============================================================================
// Friend Repository
// ============================================================================

#[async_trait]
pub trait FriendRepository: Send + Sync {
    /// How `other_id` relates to `user_id`
    async fn relationship(&self, user_id: Snowflake, other_id: Snowflake)
        -> RepoResult<Relationship>;

    /// Friends of a user ordered by username
    async fn list_friends(&self, user_id: Snowflake) -> RepoResult<Vec<User>>;

    /// Incoming and outgoing requests, newest first
    async fn list_pending(&self, user_id: Snowflake) -> RepoResult<Vec<PendingRequest>>;

    async fn create_request(&self, request: &FriendRequest) -> RepoResult<()>;

    /// Returns false if there was nothing to delete
    async fn delete_request(&self, sender_id: Snowflake, receiver_id: Snowflake)
        -> RepoResult<bool>;

    /// Drop the pending request from `sender_id` and store the friendship
    /// in both directions, atomically
    async fn accept_request(&self, sender_id: Snowflake, receiver_id: Snowflake)
        -> RepoResult<()>;

    /// Delete the friendship in both directions
    async fn remove_friend(&self, user_id: Snowflake, friend_id: Snowflake) -> RepoResult<bool>;
}

// ============================================================================
// Guild Repository
// ============================================================================

#[async_trait]
pub trait GuildRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Guild>>;

    /// Guilds the user is a member of
    async fn find_by_user(&self, user_id: Snowflake) -> RepoResult<Vec<Guild>>;

    /// Insert the guild and its owner as first member
    async fn create(&self, guild: &Guild) -> RepoResult<()>;

    /// Memberships and bans go with it
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;

    async fn is_member(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<bool>;

    /// `AlreadyMember` when the row exists
    async fn add_member(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<()>;

    async fn remove_member(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<bool>;
}

// ============================================================================
// Ban Repository
// ============================================================================

#[async_trait]
pub trait BanRepository: Send + Sync {
    async fn is_banned(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<bool>;

    /// Banned users of a guild
    async fn list_banned_users(&self, guild_id: Snowflake) -> RepoResult<Vec<User>>;

    /// Record the ban and drop the membership in one transaction
    async fn create(&self, ban: &Ban) -> RepoResult<()>;

    async fn delete(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<bool>;
}
