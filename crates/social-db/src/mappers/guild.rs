//! Guild model -> entity

use social_core::entities::Guild;
use social_core::value_objects::Snowflake;

use crate::models::GuildModel;

impl From<GuildModel> for Guild {
    fn from(model: GuildModel) -> Self {
        Guild {
            id: Snowflake::new(model.id),
            name: model.name,
            owner_id: Snowflake::new(model.owner_id),
            icon: model.icon,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
