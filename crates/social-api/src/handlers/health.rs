//! Health check handlers
//!
//! Endpoints for liveness and readiness checks.

use axum::{extract::State, http::StatusCode, Json};
use social_service::dto::{HealthResponse, ReadinessResponse};

use crate::state::AppState;

pub const HEALTH_TAG: &str = "health";

/// Liveness check
#[utoipa::path(
    get,
    path = "/health",
    tag = HEALTH_TAG,
    security(()),
    responses((status = 200, description = "Server is alive", body = HealthResponse)),
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Readiness check: PostgreSQL and Redis must both answer
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = HEALTH_TAG,
    security(()),
    responses(
        (status = 200, description = "Ready to serve traffic", body = ReadinessResponse),
        (status = 503, description = "A dependency is down", body = ReadinessResponse),
    ),
)]
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    let db_healthy = social_db::ping(state.service_context().pool()).await.is_ok();

    let redis_healthy = state
        .service_context()
        .redis_pool()
        .health_check()
        .await
        .is_ok();

    let response = ReadinessResponse::ready(db_healthy, redis_healthy);
    let status = if response.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
