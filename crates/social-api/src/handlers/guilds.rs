//! Guild handlers
//!
//! Guild creation, membership and bans.

use axum::{extract::State, Json};
use social_service::dto::{CreateGuildRequest, GuildResponse, PublicUserResponse};
use social_service::GuildService;

use crate::extractors::{AuthUser, GuildIdPath, GuildMemberPath, SnowflakePath, ValidatedJson};
use crate::response::{ApiResult, Created, ErrorBody};
use crate::state::AppState;

pub const GUILDS_TAG: &str = "guilds";

#[utoipa::path(
    post,
    path = "/guilds",
    tag = GUILDS_TAG,
    request_body = CreateGuildRequest,
    responses(
        (status = 201, description = "Guild created; the creator owns it", body = GuildResponse),
        (status = 400, description = "Invalid name", body = ErrorBody),
        (status = 401, description = "Not authenticated", body = ErrorBody),
    ),
)]
pub async fn create_guild(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateGuildRequest>,
) -> ApiResult<Created<Json<GuildResponse>>> {
    let service = GuildService::new(state.service_context());
    let response = service.create_guild(auth.user_id, request).await?;
    Ok(Created(Json(response)))
}

#[utoipa::path(
    get,
    path = "/guilds",
    tag = GUILDS_TAG,
    responses(
        (status = 200, description = "Guilds the user is a member of", body = [GuildResponse]),
        (status = 401, description = "Not authenticated", body = ErrorBody),
    ),
)]
pub async fn get_my_guilds(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<GuildResponse>>> {
    let service = GuildService::new(state.service_context());
    Ok(Json(service.get_user_guilds(auth.user_id).await?))
}

#[utoipa::path(
    delete,
    path = "/guilds/{guild_id}",
    tag = GUILDS_TAG,
    params(("guild_id" = String, Path, description = "Guild id")),
    responses(
        (status = 200, description = "Guild deleted with its memberships and bans", body = bool),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Unknown guild", body = ErrorBody),
    ),
)]
pub async fn delete_guild(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(path): SnowflakePath<GuildIdPath>,
) -> ApiResult<Json<bool>> {
    let service = GuildService::new(state.service_context());
    Ok(Json(service.delete_guild(path.guild_id()?, auth.user_id).await?))
}

// ============================================================================
// Membership
// ============================================================================

#[utoipa::path(
    post,
    path = "/guilds/{guild_id}/members",
    tag = GUILDS_TAG,
    params(("guild_id" = String, Path, description = "Guild id")),
    responses(
        (status = 200, description = "Joined", body = GuildResponse),
        (status = 403, description = "Banned from this guild", body = ErrorBody),
        (status = 404, description = "Unknown guild", body = ErrorBody),
        (status = 409, description = "Already a member", body = ErrorBody),
    ),
)]
pub async fn join_guild(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(path): SnowflakePath<GuildIdPath>,
) -> ApiResult<Json<GuildResponse>> {
    let service = GuildService::new(state.service_context());
    Ok(Json(service.join_guild(path.guild_id()?, auth.user_id).await?))
}

#[utoipa::path(
    delete,
    path = "/guilds/{guild_id}/members",
    tag = GUILDS_TAG,
    params(("guild_id" = String, Path, description = "Guild id")),
    responses(
        (status = 200, description = "Left the guild", body = bool),
        (status = 400, description = "The owner cannot leave", body = ErrorBody),
        (status = 404, description = "Unknown guild or not a member", body = ErrorBody),
    ),
)]
pub async fn leave_guild(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(path): SnowflakePath<GuildIdPath>,
) -> ApiResult<Json<bool>> {
    let service = GuildService::new(state.service_context());
    Ok(Json(service.leave_guild(path.guild_id()?, auth.user_id).await?))
}

// ============================================================================
// Bans
// ============================================================================

#[utoipa::path(
    get,
    path = "/guilds/{guild_id}/bans",
    tag = GUILDS_TAG,
    params(("guild_id" = String, Path, description = "Guild id")),
    responses(
        (status = 200, description = "Banned users", body = [PublicUserResponse]),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Unknown guild", body = ErrorBody),
    ),
)]
pub async fn get_bans(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(path): SnowflakePath<GuildIdPath>,
) -> ApiResult<Json<Vec<PublicUserResponse>>> {
    let service = GuildService::new(state.service_context());
    Ok(Json(service.get_bans(path.guild_id()?, auth.user_id).await?))
}

#[utoipa::path(
    post,
    path = "/guilds/{guild_id}/bans/{member_id}",
    tag = GUILDS_TAG,
    params(
        ("guild_id" = String, Path, description = "Guild id"),
        ("member_id" = String, Path, description = "User to ban"),
    ),
    responses(
        (status = 200, description = "Banned and removed from the guild", body = bool),
        (status = 400, description = "Cannot ban yourself", body = ErrorBody),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Unknown guild or user", body = ErrorBody),
    ),
)]
pub async fn ban_member(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(path): SnowflakePath<GuildMemberPath>,
) -> ApiResult<Json<bool>> {
    let service = GuildService::new(state.service_context());
    let banned = service
        .ban_member(path.guild_id()?, auth.user_id, path.member_id()?)
        .await?;
    Ok(Json(banned))
}

#[utoipa::path(
    delete,
    path = "/guilds/{guild_id}/bans/{member_id}",
    tag = GUILDS_TAG,
    params(
        ("guild_id" = String, Path, description = "Guild id"),
        ("member_id" = String, Path, description = "User to unban"),
    ),
    responses(
        (status = 200, description = "Ban lifted", body = bool),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Unknown guild", body = ErrorBody),
    ),
)]
pub async fn unban_member(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(path): SnowflakePath<GuildMemberPath>,
) -> ApiResult<Json<bool>> {
    let service = GuildService::new(state.service_context());
    let unbanned = service
        .unban_member(path.guild_id()?, auth.user_id, path.member_id()?)
        .await?;
    Ok(Json(unbanned))
}
