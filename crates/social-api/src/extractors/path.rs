//! Path parameter extractors
//!
//! Snowflake ids arrive as strings; anything that does not parse is a 400.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use serde::Deserialize;
use social_core::Snowflake;

use crate::response::ApiError;

/// Deserialize path parameters, turning rejections into `ApiError`
#[derive(Debug, Clone)]
pub struct SnowflakePath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for SnowflakePath<T>
where
    S: Send + Sync,
    T: serde::de::DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(inner) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.body_text()))?;

        Ok(SnowflakePath(inner))
    }
}

fn parse(value: &str, name: &str) -> Result<Snowflake, ApiError> {
    Snowflake::parse(value).map_err(|_| ApiError::invalid_path(format!("Invalid {name} format")))
}

/// `/account/{member_id}/...`
#[derive(Debug, Deserialize)]
pub struct MemberIdPath {
    pub member_id: String,
}

impl MemberIdPath {
    pub fn member_id(&self) -> Result<Snowflake, ApiError> {
        parse(&self.member_id, "member_id")
    }
}

/// `/guilds/{guild_id}/...`
#[derive(Debug, Deserialize)]
pub struct GuildIdPath {
    pub guild_id: String,
}

impl GuildIdPath {
    pub fn guild_id(&self) -> Result<Snowflake, ApiError> {
        parse(&self.guild_id, "guild_id")
    }
}

/// `/guilds/{guild_id}/bans/{member_id}`
#[derive(Debug, Deserialize)]
pub struct GuildMemberPath {
    pub guild_id: String,
    pub member_id: String,
}

impl GuildMemberPath {
    pub fn guild_id(&self) -> Result<Snowflake, ApiError> {
        parse(&self.guild_id, "guild_id")
    }

    pub fn member_id(&self) -> Result<Snowflake, ApiError> {
        parse(&self.member_id, "member_id")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ids() {
        let path = GuildMemberPath {
            guild_id: "123".into(),
            member_id: "abc".into(),
        };
        assert_eq!(path.guild_id().unwrap(), Snowflake::new(123));
        let err = path.member_id().unwrap_err();
        assert_eq!(err.to_string(), "Invalid path parameter: Invalid member_id format");

        let negative = MemberIdPath { member_id: "-5".into() };
        assert!(negative.member_id().is_err());
    }
}
