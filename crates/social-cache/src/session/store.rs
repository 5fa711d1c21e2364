//! Login sessions keyed by the id carried in the session cookie.
//!
//! `session:{id}` holds the JSON [`SessionData`]; `user_sessions:{user_id}`
//! is a set of the user's live session ids so they can all be revoked at once.
//! Every successful lookup pushes both expiries forward.

use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use social_core::Snowflake;
use uuid::Uuid;

use crate::pool::{RedisPool, RedisResult};

const SESSION_PREFIX: &str = "session:";
const USER_SESSIONS_PREFIX: &str = "user_sessions:";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub user_id: Snowflake,
    /// Unix seconds
    pub created_at: i64,
}

impl SessionData {
    #[must_use]
    pub fn new(user_id: Snowflake) -> Self {
        Self {
            user_id,
            created_at: chrono::Utc::now().timestamp(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionStore {
    pool: RedisPool,
    ttl_seconds: u64,
}

impl SessionStore {
    #[must_use]
    pub fn new(pool: RedisPool, ttl_seconds: u64) -> Self {
        Self { pool, ttl_seconds }
    }

    #[must_use]
    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    fn key(session_id: &str) -> String {
        format!("{SESSION_PREFIX}{session_id}")
    }

    fn user_key(user_id: Snowflake) -> String {
        format!("{USER_SESSIONS_PREFIX}{user_id}")
    }

    /// Cookie values that are not a UUID never reach Redis
    fn is_well_formed(session_id: &str) -> bool {
        Uuid::parse_str(session_id).is_ok()
    }

    /// Start a session and return its id
    pub async fn create(&self, user_id: Snowflake) -> RedisResult<String> {
        let session_id = Uuid::new_v4().to_string();
        self.pool
            .set(&Self::key(&session_id), &SessionData::new(user_id), Some(self.ttl_seconds))
            .await?;

        let user_key = Self::user_key(user_id);
        let mut conn = self.pool.get().await?;
        conn.sadd::<_, _, ()>(&user_key, &session_id).await?;
        drop(conn);
        self.pool.expire(&user_key, self.ttl_seconds).await?;

        tracing::debug!(user_id = %user_id, "session created");
        Ok(session_id)
    }

    /// Resolve a session and extend its lifetime
    pub async fn get(&self, session_id: &str) -> RedisResult<Option<SessionData>> {
        if !Self::is_well_formed(session_id) {
            return Ok(None);
        }

        let key = Self::key(session_id);
        let Some(data) = self.pool.get_value::<SessionData>(&key).await? else {
            return Ok(None);
        };

        self.pool.expire(&key, self.ttl_seconds).await?;
        self.pool
            .expire(&Self::user_key(data.user_id), self.ttl_seconds)
            .await?;
        Ok(Some(data))
    }

    /// End one session; false if it did not exist
    pub async fn destroy(&self, session_id: &str) -> RedisResult<bool> {
        if !Self::is_well_formed(session_id) {
            return Ok(false);
        }

        let key = Self::key(session_id);
        if let Some(data) = self.pool.get_value::<SessionData>(&key).await? {
            let mut conn = self.pool.get().await?;
            conn.srem::<_, _, ()>(Self::user_key(data.user_id), session_id)
                .await?;
        }

        self.pool.delete(&key).await
    }

    /// End every session of a user, e.g. after a password reset
    pub async fn destroy_all_for_user(&self, user_id: Snowflake) -> RedisResult<usize> {
        let user_key = Self::user_key(user_id);
        let mut conn = self.pool.get().await?;
        let session_ids: Vec<String> = conn.smembers(&user_key).await?;
        drop(conn);

        let keys: Vec<String> = session_ids.iter().map(|id| Self::key(id)).collect();
        self.pool.delete_many(&keys).await?;
        self.pool.delete(&user_key).await?;

        tracing::info!(user_id = %user_id, count = session_ids.len(), "revoked all sessions");
        Ok(session_ids.len())
    }
}
