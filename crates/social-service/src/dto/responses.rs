//! Response DTOs for API endpoints
//!
//! Snowflake IDs are serialized as strings for JavaScript compatibility.

use chrono::{DateTime, Utc};
use serde::Serialize;
use social_core::RequestDirection;
use utoipa::ToSchema;

// ============================================================================
// Account Responses
// ============================================================================

/// The logged-in user
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AccountResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub image: String,
    pub is_online: bool,
    pub last_seen: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Someone else, without the email
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PublicUserResponse {
    pub id: String,
    pub username: String,
    pub image: String,
}

// ============================================================================
// Friend Responses
// ============================================================================

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FriendResponse {
    pub id: String,
    pub username: String,
    pub image: String,
    pub is_online: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PendingType {
    Incoming,
    Outgoing,
}

impl From<RequestDirection> for PendingType {
    fn from(direction: RequestDirection) -> Self {
        match direction {
            RequestDirection::Incoming => Self::Incoming,
            RequestDirection::Outgoing => Self::Outgoing,
        }
    }
}

/// A friend request waiting on one side
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PendingRequestResponse {
    pub id: String,
    pub username: String,
    pub image: String,
    #[serde(rename = "type")]
    pub kind: PendingType,
}

// ============================================================================
// Guild Responses
// ============================================================================

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GuildResponse {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub icon: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Health Responses
// ============================================================================

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each backing service
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthChecks {
    pub database: String,
    pub redis: String,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool, redis_healthy: bool) -> Self {
        let all_healthy = database_healthy && redis_healthy;
        Self {
            status: if all_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: if database_healthy { "healthy" } else { "unhealthy" }.to_string(),
                redis: if redis_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
