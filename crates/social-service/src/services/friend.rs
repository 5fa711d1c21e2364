//! Friend service
//!
//! Every operation first resolves the [`Relationship`] between the two users,
//! asks it which transition applies, then performs that transition through
//! the repository.

use social_core::entities::FriendRequest;
use social_core::{CancelOutcome, DomainError, Relationship, SendOutcome, Snowflake};
use tracing::{debug, info, instrument};

use crate::dto::{FriendResponse, PendingRequestResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct FriendService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> FriendService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Friends ordered by username
    #[instrument(skip(self))]
    pub async fn friends(&self, user_id: Snowflake) -> ServiceResult<Vec<FriendResponse>> {
        let friends = self.ctx.friend_repo().list_friends(user_id).await?;
        Ok(friends.into_iter().map(FriendResponse::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn pending(&self, user_id: Snowflake) -> ServiceResult<Vec<PendingRequestResponse>> {
        let pending = self.ctx.friend_repo().list_pending(user_id).await?;
        Ok(pending.into_iter().map(PendingRequestResponse::from).collect())
    }

    /// Send a request. If `member_id` already asked us, this accepts instead.
    #[instrument(skip(self))]
    pub async fn send(&self, user_id: Snowflake, member_id: Snowflake) -> ServiceResult<bool> {
        let relationship = self.relationship(user_id, member_id).await?;

        match relationship.send()? {
            SendOutcome::CreateRequest => {
                self.ctx
                    .friend_repo()
                    .create_request(&FriendRequest::new(user_id, member_id))
                    .await?;
                info!(user_id = %user_id, member_id = %member_id, "Friend request sent");
            }
            SendOutcome::AcceptIncoming => {
                self.ctx.friend_repo().accept_request(member_id, user_id).await?;
                info!(user_id = %user_id, member_id = %member_id, "Mutual friend request accepted");
            }
            SendOutcome::AlreadyPending => {
                debug!(user_id = %user_id, member_id = %member_id, "Friend request already pending");
            }
        }

        Ok(true)
    }

    #[instrument(skip(self))]
    pub async fn accept(&self, user_id: Snowflake, member_id: Snowflake) -> ServiceResult<bool> {
        self.relationship(user_id, member_id).await?.accept()?;

        self.ctx.friend_repo().accept_request(member_id, user_id).await?;
        info!(user_id = %user_id, member_id = %member_id, "Friend request accepted");
        Ok(true)
    }

    /// Withdraw our request or decline theirs
    #[instrument(skip(self))]
    pub async fn cancel(&self, user_id: Snowflake, member_id: Snowflake) -> ServiceResult<bool> {
        let removed = match self.relationship(user_id, member_id).await?.cancel() {
            CancelOutcome::WithdrawOutgoing => {
                self.ctx.friend_repo().delete_request(user_id, member_id).await?
            }
            CancelOutcome::DeclineIncoming => {
                self.ctx.friend_repo().delete_request(member_id, user_id).await?
            }
            CancelOutcome::Nothing => false,
        };

        if removed {
            info!(user_id = %user_id, member_id = %member_id, "Friend request cancelled");
        }
        Ok(true)
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, user_id: Snowflake, member_id: Snowflake) -> ServiceResult<bool> {
        if self.relationship(user_id, member_id).await?.remove()? {
            self.ctx.friend_repo().remove_friend(user_id, member_id).await?;
            info!(user_id = %user_id, member_id = %member_id, "Friend removed");
        }
        Ok(true)
    }

    /// Relationship with an existing member; 404 for unknown ids
    async fn relationship(&self, user_id: Snowflake, member_id: Snowflake) -> ServiceResult<Relationship> {
        if user_id != member_id && self.ctx.user_repo().find_by_id(member_id).await?.is_none() {
            return Err(DomainError::UserNotFound(member_id).into());
        }
        Ok(self.ctx.friend_repo().relationship(user_id, member_id).await?)
    }
}
