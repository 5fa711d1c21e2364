//! Account handlers
//!
//! Registration, login and logout, passwords, the account page and the
//! friend endpoints. Starting and ending sessions happens here: the cookie
//! carries an opaque session id that maps to the user in Redis.

use axum::{extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use social_core::Snowflake;
use social_service::dto::{
    AccountResponse, ChangePasswordRequest, ForgotPasswordRequest, FriendResponse, LoginRequest,
    PendingRequestResponse, RegisterRequest, ResetPasswordRequest, UpdateAccountForm,
};
use social_service::{AccountService, FriendService, ServiceError};
use tracing::warn;

use crate::extractors::{AccountForm, AuthUser, MemberIdPath, OptionalAuthUser, SnowflakePath, ValidatedJson};
use crate::response::{ApiResult, Created, ErrorBody};
use crate::state::AppState;

pub const ACCOUNT_TAG: &str = "account";
pub const FRIENDS_TAG: &str = "friends";

/// Create a session for `user_id` and set its cookie
async fn start_session(state: &AppState, jar: CookieJar, user_id: Snowflake) -> ApiResult<CookieJar> {
    let session_id = state
        .session_store()
        .create(user_id)
        .await
        .map_err(ServiceError::from)?;

    let cookie = session_cookie(
        state.cookie_name(),
        session_id,
        state.session_store().ttl_seconds(),
        state.config().app.env.is_production(),
    );

    Ok(jar.add(cookie))
}

/// `Secure` only in production so local HTTP development keeps working
fn session_cookie(name: &str, session_id: String, ttl_seconds: u64, secure: bool) -> Cookie<'static> {
    let ttl = i64::try_from(ttl_seconds).unwrap_or(i64::MAX);
    Cookie::build((name.to_string(), session_id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::seconds(ttl))
        .build()
}

fn clear_session_cookie(state: &AppState, jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build((state.cookie_name().to_string(), "")).path("/"))
}

// ============================================================================
// Session
// ============================================================================

#[utoipa::path(
    post,
    path = "/account/register",
    tag = ACCOUNT_TAG,
    security(()),
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created and session started", body = AccountResponse),
        (status = 400, description = "Invalid form or email already in use", body = ErrorBody),
    ),
)]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<Created<(CookieJar, Json<AccountResponse>)>> {
    let user = AccountService::new(state.service_context()).register(request).await?;
    let jar = start_session(&state, jar, user.id).await?;
    Ok(Created((jar, Json(AccountResponse::from(user)))))
}

#[utoipa::path(
    post,
    path = "/account/login",
    tag = ACCOUNT_TAG,
    security(()),
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session started", body = AccountResponse),
        (status = 400, description = "Invalid form", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody),
    ),
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<(CookieJar, Json<AccountResponse>)> {
    let user = AccountService::new(state.service_context()).login(request).await?;
    let jar = start_session(&state, jar, user.id).await?;
    Ok((jar, Json(AccountResponse::from(user))))
}

/// Always succeeds; without a live session there is nothing to end
#[utoipa::path(
    post,
    path = "/account/logout",
    tag = ACCOUNT_TAG,
    security(()),
    responses((status = 200, description = "Session ended", body = bool)),
)]
pub async fn logout(
    State(state): State<AppState>,
    OptionalAuthUser(auth): OptionalAuthUser,
    jar: CookieJar,
) -> ApiResult<(CookieJar, Json<bool>)> {
    if let Some(auth) = auth {
        state
            .session_store()
            .destroy(&auth.session_id)
            .await
            .map_err(ServiceError::from)?;

        if let Err(e) = AccountService::new(state.service_context()).logout(auth.user_id).await {
            warn!(user_id = %auth.user_id, error = %e, "Failed to record logout");
        }
    }

    Ok((clear_session_cookie(&state, jar), Json(true)))
}

// ============================================================================
// Passwords
// ============================================================================

#[utoipa::path(
    put,
    path = "/account/change-password",
    tag = ACCOUNT_TAG,
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = bool),
        (status = 400, description = "Invalid form or wrong current password", body = ErrorBody),
        (status = 401, description = "Not authenticated", body = ErrorBody),
    ),
)]
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> ApiResult<Json<bool>> {
    let changed = AccountService::new(state.service_context())
        .change_password(auth.user_id, request)
        .await?;
    Ok(Json(changed))
}

#[utoipa::path(
    post,
    path = "/account/forgot-password",
    tag = ACCOUNT_TAG,
    security(()),
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset link sent if the email is registered", body = bool),
        (status = 400, description = "Invalid email", body = ErrorBody),
    ),
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ForgotPasswordRequest>,
) -> ApiResult<Json<bool>> {
    let sent = AccountService::new(state.service_context())
        .forgot_password(request)
        .await?;
    Ok(Json(sent))
}

/// Old sessions are revoked by the service; the caller gets a fresh one
#[utoipa::path(
    post,
    path = "/account/reset-password",
    tag = ACCOUNT_TAG,
    security(()),
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset and session started", body = AccountResponse),
        (status = 400, description = "Invalid form, expired token or deleted user", body = ErrorBody),
    ),
)]
pub async fn reset_password(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(request): ValidatedJson<ResetPasswordRequest>,
) -> ApiResult<(CookieJar, Json<AccountResponse>)> {
    let user = AccountService::new(state.service_context())
        .reset_password(request)
        .await?;
    let jar = start_session(&state, jar, user.id).await?;
    Ok((jar, Json(AccountResponse::from(user))))
}

// ============================================================================
// Account page
// ============================================================================

#[utoipa::path(
    get,
    path = "/account",
    tag = ACCOUNT_TAG,
    responses(
        (status = 200, description = "The logged-in user", body = AccountResponse),
        (status = 401, description = "Not authenticated", body = ErrorBody),
    ),
)]
pub async fn get_account(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<AccountResponse>> {
    let user = AccountService::new(state.service_context())
        .current_user(auth.user_id)
        .await?;
    Ok(Json(AccountResponse::from(user)))
}

#[utoipa::path(
    put,
    path = "/account",
    tag = ACCOUNT_TAG,
    request_body(content = UpdateAccountForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Account updated", body = AccountResponse),
        (status = 400, description = "Invalid form, email in use or bad image", body = ErrorBody),
        (status = 401, description = "Not authenticated", body = ErrorBody),
    ),
)]
pub async fn update_account(
    State(state): State<AppState>,
    auth: AuthUser,
    form: AccountForm,
) -> ApiResult<Json<AccountResponse>> {
    let user = AccountService::new(state.service_context())
        .update_account(auth.user_id, form.fields, form.image)
        .await?;
    Ok(Json(AccountResponse::from(user)))
}

// ============================================================================
// Friends
// ============================================================================

#[utoipa::path(
    get,
    path = "/account/me/friends",
    tag = FRIENDS_TAG,
    responses(
        (status = 200, description = "Friends ordered by username", body = [FriendResponse]),
        (status = 401, description = "Not authenticated", body = ErrorBody),
    ),
)]
pub async fn get_friends(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<FriendResponse>>> {
    let friends = FriendService::new(state.service_context()).friends(auth.user_id).await?;
    Ok(Json(friends))
}

#[utoipa::path(
    get,
    path = "/account/me/pending",
    tag = FRIENDS_TAG,
    responses(
        (status = 200, description = "Incoming and outgoing friend requests", body = [PendingRequestResponse]),
        (status = 401, description = "Not authenticated", body = ErrorBody),
    ),
)]
pub async fn get_pending(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<PendingRequestResponse>>> {
    let pending = FriendService::new(state.service_context()).pending(auth.user_id).await?;
    Ok(Json(pending))
}

#[utoipa::path(
    post,
    path = "/account/{member_id}/friend",
    tag = FRIENDS_TAG,
    params(("member_id" = String, Path, description = "User to befriend")),
    responses(
        (status = 200, description = "Request sent, or accepted if they asked first", body = bool),
        (status = 400, description = "Cannot add yourself", body = ErrorBody),
        (status = 404, description = "Unknown user", body = ErrorBody),
        (status = 409, description = "Already friends", body = ErrorBody),
    ),
)]
pub async fn send_friend_request(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(path): SnowflakePath<MemberIdPath>,
) -> ApiResult<Json<bool>> {
    let sent = FriendService::new(state.service_context())
        .send(auth.user_id, path.member_id()?)
        .await?;
    Ok(Json(sent))
}

#[utoipa::path(
    post,
    path = "/account/{member_id}/friend/accept",
    tag = FRIENDS_TAG,
    params(("member_id" = String, Path, description = "User whose request to accept")),
    responses(
        (status = 200, description = "Now friends", body = bool),
        (status = 400, description = "No pending request from this user", body = ErrorBody),
        (status = 404, description = "Unknown user", body = ErrorBody),
    ),
)]
pub async fn accept_friend_request(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(path): SnowflakePath<MemberIdPath>,
) -> ApiResult<Json<bool>> {
    let accepted = FriendService::new(state.service_context())
        .accept(auth.user_id, path.member_id()?)
        .await?;
    Ok(Json(accepted))
}

#[utoipa::path(
    post,
    path = "/account/{member_id}/friend/cancel",
    tag = FRIENDS_TAG,
    params(("member_id" = String, Path, description = "Other side of the request")),
    responses(
        (status = 200, description = "Request withdrawn or declined", body = bool),
        (status = 404, description = "Unknown user", body = ErrorBody),
    ),
)]
pub async fn cancel_friend_request(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(path): SnowflakePath<MemberIdPath>,
) -> ApiResult<Json<bool>> {
    let cancelled = FriendService::new(state.service_context())
        .cancel(auth.user_id, path.member_id()?)
        .await?;
    Ok(Json(cancelled))
}

#[utoipa::path(
    delete,
    path = "/account/{member_id}/friend",
    tag = FRIENDS_TAG,
    params(("member_id" = String, Path, description = "Friend to remove")),
    responses(
        (status = 200, description = "No longer friends", body = bool),
        (status = 400, description = "Cannot remove yourself", body = ErrorBody),
        (status = 404, description = "Unknown user", body = ErrorBody),
    ),
)]
pub async fn remove_friend(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(path): SnowflakePath<MemberIdPath>,
) -> ApiResult<Json<bool>> {
    let removed = FriendService::new(state.service_context())
        .remove(auth.user_id, path.member_id()?)
        .await?;
    Ok(Json(removed))
}
