//! Reset tokens and session revocation as the account service sees them.
//!
//! Production uses the Redis stores from `social-cache`; tests swap in
//! in-memory versions through [`ServiceContextBuilder`](super::ServiceContextBuilder).

use async_trait::async_trait;
use social_cache::{PasswordResetStore, SessionStore};
use social_core::Snowflake;

use super::error::ServiceResult;

#[async_trait]
pub trait ResetTokens: Send + Sync {
    /// Mint a single-use token for `user_id`
    async fn issue(&self, user_id: Snowflake) -> ServiceResult<String>;

    /// Redeem a token; `None` when it expired or was already used
    async fn consume(&self, token: &str) -> ServiceResult<Option<Snowflake>>;
}

#[async_trait]
pub trait SessionRevoker: Send + Sync {
    /// End every session of the user, returning how many there were
    async fn revoke_all(&self, user_id: Snowflake) -> ServiceResult<usize>;
}

#[async_trait]
impl ResetTokens for PasswordResetStore {
    async fn issue(&self, user_id: Snowflake) -> ServiceResult<String> {
        Ok(PasswordResetStore::issue(self, user_id).await?)
    }

    async fn consume(&self, token: &str) -> ServiceResult<Option<Snowflake>> {
        Ok(PasswordResetStore::consume(self, token).await?)
    }
}

#[async_trait]
impl SessionRevoker for SessionStore {
    async fn revoke_all(&self, user_id: Snowflake) -> ServiceResult<usize> {
        Ok(self.destroy_all_for_user(user_id).await?)
    }
}
