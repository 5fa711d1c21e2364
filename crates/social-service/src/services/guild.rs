//! Guild service
//!
//! Guild creation, membership and bans. Only the owner may delete a guild or
//! manage its bans.

use social_core::entities::{Ban, Guild};
use social_core::{DomainError, Snowflake};
use tracing::{info, instrument};

use crate::dto::{CreateGuildRequest, GuildResponse, PublicUserResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct GuildService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> GuildService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a guild owned by `owner_id`, who also becomes its first member
    #[instrument(skip(self, request))]
    pub async fn create_guild(
        &self,
        owner_id: Snowflake,
        request: CreateGuildRequest,
    ) -> ServiceResult<GuildResponse> {
        let guild = Guild::new(self.ctx.generate_id(), request.name, owner_id);
        self.ctx.guild_repo().create(&guild).await?;

        info!(guild_id = %guild.id, owner_id = %owner_id, "Guild created");
        Ok(GuildResponse::from(&guild))
    }

    /// Guilds the user is a member of
    #[instrument(skip(self))]
    pub async fn get_user_guilds(&self, user_id: Snowflake) -> ServiceResult<Vec<GuildResponse>> {
        let guilds = self.ctx.guild_repo().find_by_user(user_id).await?;
        Ok(guilds.into_iter().map(GuildResponse::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn join_guild(&self, guild_id: Snowflake, user_id: Snowflake) -> ServiceResult<GuildResponse> {
        let guild = self.get_guild(guild_id).await?;

        if self.ctx.ban_repo().is_banned(guild_id, user_id).await? {
            return Err(DomainError::UserBanned.into());
        }

        self.ctx.guild_repo().add_member(guild_id, user_id).await?;

        info!(guild_id = %guild_id, user_id = %user_id, "User joined guild");
        Ok(GuildResponse::from(guild))
    }

    /// Leave a guild. The owner has to delete it instead.
    #[instrument(skip(self))]
    pub async fn leave_guild(&self, guild_id: Snowflake, user_id: Snowflake) -> ServiceResult<bool> {
        let guild = self.get_guild(guild_id).await?;

        if guild.is_owner(user_id) {
            return Err(DomainError::CannotLeaveOwnedGuild.into());
        }

        if !self.ctx.guild_repo().remove_member(guild_id, user_id).await? {
            return Err(DomainError::MemberNotFound.into());
        }

        info!(guild_id = %guild_id, user_id = %user_id, "User left guild");
        Ok(true)
    }

    /// Delete a guild with its memberships and bans
    #[instrument(skip(self))]
    pub async fn delete_guild(&self, guild_id: Snowflake, user_id: Snowflake) -> ServiceResult<bool> {
        self.owned_guild(guild_id, user_id).await?;
        self.ctx.guild_repo().delete(guild_id).await?;

        info!(guild_id = %guild_id, "Guild deleted");
        Ok(true)
    }

    #[instrument(skip(self))]
    pub async fn get_bans(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<Vec<PublicUserResponse>> {
        self.owned_guild(guild_id, user_id).await?;

        let users = self.ctx.ban_repo().list_banned_users(guild_id).await?;
        Ok(users.into_iter().map(PublicUserResponse::from).collect())
    }

    /// Ban a member: the membership goes and the ban is recorded together
    #[instrument(skip(self))]
    pub async fn ban_member(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        member_id: Snowflake,
    ) -> ServiceResult<bool> {
        let guild = self.owned_guild(guild_id, user_id).await?;

        if guild.is_owner(member_id) {
            return Err(DomainError::CannotBanSelf.into());
        }

        if self.ctx.user_repo().find_by_id(member_id).await?.is_none() {
            return Err(DomainError::UserNotFound(member_id).into());
        }

        self.ctx.ban_repo().create(&Ban::new(member_id, guild_id)).await?;

        info!(guild_id = %guild_id, member_id = %member_id, "Member banned");
        Ok(true)
    }

    /// Lift a ban. Unbanning someone who is not banned is not an error.
    #[instrument(skip(self))]
    pub async fn unban_member(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        member_id: Snowflake,
    ) -> ServiceResult<bool> {
        self.owned_guild(guild_id, user_id).await?;

        if self.ctx.ban_repo().delete(guild_id, member_id).await? {
            info!(guild_id = %guild_id, member_id = %member_id, "Member unbanned");
        }
        Ok(true)
    }

    async fn get_guild(&self, guild_id: Snowflake) -> ServiceResult<Guild> {
        self.ctx
            .guild_repo()
            .find_by_id(guild_id)
            .await?
            .ok_or_else(|| DomainError::GuildNotFound(guild_id).into())
    }

    async fn owned_guild(&self, guild_id: Snowflake, user_id: Snowflake) -> ServiceResult<Guild> {
        let guild = self.get_guild(guild_id).await?;
        if !guild.is_owner(user_id) {
            return Err(DomainError::NotGuildOwner.into());
        }
        Ok(guild)
    }
}
