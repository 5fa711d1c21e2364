//! # social-core
//!
//! Domain layer: entities, value objects, the friend relationship rules and the
//! repository traits implemented by the infrastructure crates.
//! Nothing in here knows about PostgreSQL, Redis or HTTP.

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

pub use entities::{Ban, FriendRequest, Guild, PendingRequest, RequestDirection, User};
pub use error::DomainError;
pub use traits::{BanRepository, FriendRepository, GuildRepository, RepoResult, UserRepository};
pub use value_objects::{
    CancelOutcome, Relationship, SendOutcome, Snowflake, SnowflakeGenerator, SnowflakeParseError,
};
