//! Route definitions
//!
//! Account and friend routes under `/account`, guild routes under `/guilds`,
//! uploaded files, and the OpenAPI document.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use social_common::StorageConfig;
use tower_http::services::ServeDir;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{account, guilds, health};
use crate::openapi::ApiDoc;
use crate::state::AppState;

pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";
pub const SWAGGER_UI_PATH: &str = "/docs";

/// API routes (health is exported separately to bypass rate limiting)
pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(account_routes())
        .merge(friend_routes())
        .merge(guild_routes())
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// Uploaded avatars and the API documentation
pub fn public_routes(storage: &StorageConfig, cookie_name: &str) -> Router<AppState> {
    Router::new()
        .nest_service(&storage.public_path, ServeDir::new(&storage.upload_dir))
        .merge(SwaggerUi::new(SWAGGER_UI_PATH).url(OPENAPI_JSON_PATH, ApiDoc::with_cookie_name(cookie_name)))
}

fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/account", get(account::get_account).put(account::update_account))
        .route("/account/register", post(account::register))
        .route("/account/login", post(account::login))
        .route("/account/logout", post(account::logout))
        .route("/account/change-password", put(account::change_password))
        .route("/account/forgot-password", post(account::forgot_password))
        .route("/account/reset-password", post(account::reset_password))
}

fn friend_routes() -> Router<AppState> {
    Router::new()
        .route("/account/me/friends", get(account::get_friends))
        .route("/account/me/pending", get(account::get_pending))
        .route(
            "/account/:member_id/friend",
            post(account::send_friend_request).delete(account::remove_friend),
        )
        .route("/account/:member_id/friend/accept", post(account::accept_friend_request))
        .route("/account/:member_id/friend/cancel", post(account::cancel_friend_request))
}

fn guild_routes() -> Router<AppState> {
    Router::new()
        .route("/guilds", post(guilds::create_guild).get(guilds::get_my_guilds))
        .route("/guilds/:guild_id", delete(guilds::delete_guild))
        .route(
            "/guilds/:guild_id/members",
            post(guilds::join_guild).delete(guilds::leave_guild),
        )
        .route("/guilds/:guild_id/bans", get(guilds::get_bans))
        .route(
            "/guilds/:guild_id/bans/:member_id",
            post(guilds::ban_member).delete(guilds::unban_member),
        )
}
