//! User model -> entity

use social_core::entities::{PendingRequest, RequestDirection, User};
use social_core::value_objects::Snowflake;

use crate::models::{PendingRequestModel, UserModel};

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: Snowflake::new(model.id),
            username: model.username,
            email: model.email,
            image: model.image,
            is_online: model.is_online,
            last_seen: model.last_seen,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<PendingRequestModel> for PendingRequest {
    fn from(model: PendingRequestModel) -> Self {
        let direction = if model.direction == "incoming" {
            RequestDirection::Incoming
        } else {
            RequestDirection::Outgoing
        };
        PendingRequest {
            user: model.user.into(),
            direction,
        }
    }
}
