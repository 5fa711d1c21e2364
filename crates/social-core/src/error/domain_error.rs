//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(Snowflake),

    #[error("Guild not found: {0}")]
    GuildNotFound(Snowflake),

    #[error("Not a member of this guild")]
    MemberNotFound,

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("You cannot add yourself")]
    CannotFriendSelf,

    #[error("You cannot remove yourself")]
    CannotRemoveSelf,

    #[error("You cannot ban yourself")]
    CannotBanSelf,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Not guild owner")]
    NotGuildOwner,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Email already in use")]
    EmailAlreadyExists,

    #[error("You are already friends")]
    AlreadyFriends,

    #[error("Already a member of this guild")]
    AlreadyMember,

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    #[error("No pending friend request from this user")]
    NoPendingRequest,

    #[error("Cannot leave owned guild")]
    CannotLeaveOwnedGuild,

    #[error("User is banned from this guild")]
    UserBanned,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::GuildNotFound(_) => "UNKNOWN_GUILD",
            Self::MemberNotFound => "UNKNOWN_MEMBER",

            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::CannotFriendSelf => "CANNOT_FRIEND_SELF",
            Self::CannotRemoveSelf => "CANNOT_REMOVE_SELF",
            Self::CannotBanSelf => "CANNOT_BAN_SELF",

            Self::NotGuildOwner => "NOT_GUILD_OWNER",

            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::AlreadyFriends => "ALREADY_FRIENDS",
            Self::AlreadyMember => "ALREADY_MEMBER",

            Self::NoPendingRequest => "NO_PENDING_REQUEST",
            Self::CannotLeaveOwnedGuild => "CANNOT_LEAVE_OWNED_GUILD",
            Self::UserBanned => "USER_BANNED",

            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_) | Self::GuildNotFound(_) | Self::MemberNotFound
        )
    }

    /// Client mistakes that map to 400, including broken business rules
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::CannotFriendSelf
                | Self::CannotRemoveSelf
                | Self::CannotBanSelf
                | Self::NoPendingRequest
                | Self::CannotLeaveOwnedGuild
        )
    }

    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::NotGuildOwner | Self::UserBanned)
    }

    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::EmailAlreadyExists | Self::AlreadyFriends | Self::AlreadyMember
        )
    }
}
