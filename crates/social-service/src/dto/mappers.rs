//! Entity to DTO mappers

use social_core::entities::{Guild, PendingRequest, User};

use super::responses::{
    AccountResponse, FriendResponse, GuildResponse, PendingRequestResponse, PublicUserResponse,
};

// ============================================================================
// User Mappers
// ============================================================================

impl From<&User> for AccountResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            image: user.image.clone(),
            is_online: user.is_online,
            last_seen: user.last_seen,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<User> for AccountResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

impl From<&User> for PublicUserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            image: user.image.clone(),
        }
    }
}

impl From<User> for PublicUserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

impl From<User> for FriendResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username,
            image: user.image,
            is_online: user.is_online,
        }
    }
}

impl From<PendingRequest> for PendingRequestResponse {
    fn from(pending: PendingRequest) -> Self {
        Self {
            id: pending.user.id.to_string(),
            username: pending.user.username,
            image: pending.user.image,
            kind: pending.direction.into(),
        }
    }
}

// ============================================================================
// Guild Mappers
// ============================================================================

impl From<&Guild> for GuildResponse {
    fn from(guild: &Guild) -> Self {
        Self {
            id: guild.id.to_string(),
            name: guild.name.clone(),
            owner_id: guild.owner_id.to_string(),
            icon: guild.icon.clone(),
            created_at: guild.created_at,
            updated_at: guild.updated_at,
        }
    }
}

impl From<Guild> for GuildResponse {
    fn from(guild: Guild) -> Self {
        Self::from(&guild)
    }
}
