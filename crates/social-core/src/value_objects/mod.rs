//! Value objects - immutable types that represent domain concepts

mod relationship;
mod snowflake;

pub use relationship::{CancelOutcome, Relationship, SendOutcome};
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
