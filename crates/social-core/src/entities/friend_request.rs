//! Pending friend requests

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::User;
use crate::value_objects::Snowflake;

/// A request from `sender_id` to `receiver_id` that has not been answered yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FriendRequest {
    pub sender_id: Snowflake,
    pub receiver_id: Snowflake,
    pub created_at: DateTime<Utc>,
}

impl FriendRequest {
    pub fn new(sender_id: Snowflake, receiver_id: Snowflake) -> Self {
        Self {
            sender_id,
            receiver_id,
            created_at: Utc::now(),
        }
    }

    /// Direction of this request as seen by `user_id`, `None` if not involved
    pub fn direction_for(&self, user_id: Snowflake) -> Option<RequestDirection> {
        if self.sender_id == user_id {
            Some(RequestDirection::Outgoing)
        } else if self.receiver_id == user_id {
            Some(RequestDirection::Incoming)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestDirection {
    Incoming,
    Outgoing,
}

/// The other side of a pending request together with its direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub user: User,
    pub direction: RequestDirection,
}
