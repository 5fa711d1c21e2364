//! Session authentication extractor
//!
//! Reads the session cookie, resolves it in the Redis session store and
//! yields the user it belongs to.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::CookieJar;
use social_core::Snowflake;
use social_service::ServiceError;

use crate::response::ApiError;
use crate::state::AppState;

/// Authenticated user behind a live session
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Snowflake,
    pub session_id: String,
}

impl AuthUser {
    async fn resolve(parts: &Parts, state: &AppState) -> Result<Option<Self>, ApiError> {
        let jar = CookieJar::from_headers(&parts.headers);
        let Some(cookie) = jar.get(state.cookie_name()) else {
            return Ok(None);
        };

        let session_id = cookie.value().to_string();
        let session = state
            .session_store()
            .get(&session_id)
            .await
            .map_err(ServiceError::from)?;

        Ok(session.map(|data| Self {
            user_id: data.user_id,
            session_id,
        }))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        Self::resolve(parts, &app_state)
            .await?
            .ok_or(ApiError::MissingAuth)
    }
}

/// Session user if there is one; never rejects for a missing or stale cookie
#[derive(Debug, Clone)]
pub struct OptionalAuthUser(pub Option<AuthUser>);

#[async_trait]
impl<S> FromRequestParts<S> for OptionalAuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        Ok(Self(AuthUser::resolve(parts, &app_state).await?))
    }
}
