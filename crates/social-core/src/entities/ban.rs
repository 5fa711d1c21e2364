//! Ban - join entity between a user and the guild they are banned from

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Keyed by `(user_id, guild_id)`; removed together with its guild
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ban {
    pub user_id: Snowflake,
    pub guild_id: Snowflake,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ban {
    pub fn new(user_id: Snowflake, guild_id: Snowflake) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            guild_id,
            created_at: now,
            updated_at: now,
        }
    }
}
