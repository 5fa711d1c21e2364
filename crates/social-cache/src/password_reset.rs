//! Single-use password reset tokens.
//!
//! `forget-password:{token}` holds the user id for three days. Redeeming the
//! token deletes it in the same round trip, so a token works once.

use social_core::Snowflake;
use uuid::Uuid;

use crate::pool::{RedisPool, RedisResult};

pub const FORGET_PASSWORD_PREFIX: &str = "forget-password:";

/// Three days
pub const RESET_TOKEN_TTL: u64 = 60 * 60 * 24 * 3;

#[derive(Debug, Clone)]
pub struct PasswordResetStore {
    pool: RedisPool,
}

impl PasswordResetStore {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    fn key(token: &str) -> String {
        format!("{FORGET_PASSWORD_PREFIX}{token}")
    }

    /// Mint a token for `user_id`
    pub async fn issue(&self, user_id: Snowflake) -> RedisResult<String> {
        let token = Uuid::new_v4().to_string();
        self.pool
            .set(&Self::key(&token), &user_id, Some(RESET_TOKEN_TTL))
            .await?;
        tracing::debug!(user_id = %user_id, "password reset token issued");
        Ok(token)
    }

    /// Redeem a token; `None` when it expired or was already used
    pub async fn consume(&self, token: &str) -> RedisResult<Option<Snowflake>> {
        self.pool.take_value(&Self::key(token)).await
    }
}
