//! PostgreSQL implementation of FriendRepository
//!
//! Friendships are stored as two mirrored rows so listing friends is a single
//! indexed lookup on `user_id`.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use social_core::entities::{FriendRequest, PendingRequest, User};
use social_core::error::DomainError;
use social_core::traits::{FriendRepository, RepoResult};
use social_core::value_objects::{Relationship, Snowflake};

use crate::models::{PendingRequestModel, UserModel};

use super::error::map_db_error;

#[derive(Clone)]
pub struct PgFriendRepository {
    pool: PgPool,
}

impl PgFriendRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FriendRepository for PgFriendRepository {
    #[instrument(skip(self))]
    async fn relationship(
        &self,
        user_id: Snowflake,
        other_id: Snowflake,
    ) -> RepoResult<Relationship> {
        if user_id == other_id {
            return Ok(Relationship::SelfUser);
        }

        let (friends, outgoing, incoming) = sqlx::query_as::<_, (bool, bool, bool)>(
            r"
            SELECT
                EXISTS(SELECT 1 FROM friends WHERE user_id = $1 AND friend_id = $2),
                EXISTS(SELECT 1 FROM friend_requests WHERE sender_id = $1 AND receiver_id = $2),
                EXISTS(SELECT 1 FROM friend_requests WHERE sender_id = $2 AND receiver_id = $1)
            ",
        )
        .bind(user_id.into_inner())
        .bind(other_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(if friends {
            Relationship::Friends
        } else if incoming {
            Relationship::Incoming
        } else if outgoing {
            Relationship::Outgoing
        } else {
            Relationship::None
        })
    }

    #[instrument(skip(self))]
    async fn list_friends(&self, user_id: Snowflake) -> RepoResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserModel>(
            r"
            SELECT u.id, u.username, u.email, u.image, u.is_online, u.last_seen,
                   u.created_at, u.updated_at
            FROM friends f
            JOIN users u ON u.id = f.friend_id
            WHERE f.user_id = $1
            ORDER BY u.username, u.id
            ",
        )
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    #[instrument(skip(self))]
    async fn list_pending(&self, user_id: Snowflake) -> RepoResult<Vec<PendingRequest>> {
        let rows = sqlx::query_as::<_, PendingRequestModel>(
            r"
            SELECT u.id, u.username, u.email, u.image, u.is_online, u.last_seen,
                   u.created_at, u.updated_at,
                   'incoming' AS direction, r.created_at AS requested_at
            FROM friend_requests r
            JOIN users u ON u.id = r.sender_id
            WHERE r.receiver_id = $1
            UNION ALL
            SELECT u.id, u.username, u.email, u.image, u.is_online, u.last_seen,
                   u.created_at, u.updated_at,
                   'outgoing' AS direction, r.created_at AS requested_at
            FROM friend_requests r
            JOIN users u ON u.id = r.receiver_id
            WHERE r.sender_id = $1
            ORDER BY requested_at DESC
            ",
        )
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(PendingRequest::from).collect())
    }

    #[instrument(skip(self, request), fields(sender = %request.sender_id, receiver = %request.receiver_id))]
    async fn create_request(&self, request: &FriendRequest) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO friend_requests (sender_id, receiver_id, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (sender_id, receiver_id) DO NOTHING
            ",
        )
        .bind(request.sender_id.into_inner())
        .bind(request.receiver_id.into_inner())
        .bind(request.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_request(&self, sender_id: Snowflake, receiver_id: Snowflake) -> RepoResult<bool> {
        let result =
            sqlx::query("DELETE FROM friend_requests WHERE sender_id = $1 AND receiver_id = $2")
                .bind(sender_id.into_inner())
                .bind(receiver_id.into_inner())
                .execute(&self.pool)
                .await
                .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn accept_request(&self, sender_id: Snowflake, receiver_id: Snowflake) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let removed = sqlx::query(
            r"
            DELETE FROM friend_requests
            WHERE (sender_id = $1 AND receiver_id = $2)
               OR (sender_id = $2 AND receiver_id = $1)
            ",
        )
        .bind(sender_id.into_inner())
        .bind(receiver_id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if removed.rows_affected() == 0 {
            // Dropping the transaction rolls it back
            return Err(DomainError::NoPendingRequest);
        }

        sqlx::query(
            r"
            INSERT INTO friends (user_id, friend_id)
            VALUES ($1, $2), ($2, $1)
            ON CONFLICT DO NOTHING
            ",
        )
        .bind(sender_id.into_inner())
        .bind(receiver_id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn remove_friend(&self, user_id: Snowflake, friend_id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            DELETE FROM friends
            WHERE (user_id = $1 AND friend_id = $2)
               OR (user_id = $2 AND friend_id = $1)
            ",
        )
        .bind(user_id.into_inner())
        .bind(friend_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
