//! OpenAPI document
//!
//! Registers every handler path, the request/response schemas and the
//! session cookie security scheme. Served at `/api-docs/openapi.json` and
//! browsable through Swagger UI at `/docs`.

use social_common::{ErrorResponse, FieldError};
use social_service::dto::{
    AccountResponse, ChangePasswordRequest, CreateGuildRequest, ForgotPasswordRequest,
    FriendResponse, GuildResponse, HealthChecks, HealthResponse, LoginRequest,
    PendingRequestResponse, PendingType, PublicUserResponse, ReadinessResponse, RegisterRequest,
    ResetPasswordRequest, UpdateAccountForm,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::handlers::{account, guilds, health};
use crate::response::ErrorBody;

pub const SECURITY_SCHEME: &str = "SessionCookie";
const DEFAULT_COOKIE_NAME: &str = "qid";

fn cookie_scheme(cookie_name: &str) -> SecurityScheme {
    SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
        cookie_name,
        "Session cookie issued by POST /account/login and POST /account/register.",
    )))
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(SECURITY_SCHEME, cookie_scheme(DEFAULT_COOKIE_NAME));
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Social API",
        description = "Accounts, friends and guilds behind a session cookie."
    ),
    servers((url = "/", description = "Relative to the deployment base URL")),
    security(("SessionCookie" = [])),
    paths(
        account::register,
        account::login,
        account::logout,
        account::change_password,
        account::forgot_password,
        account::reset_password,
        account::get_account,
        account::update_account,
        account::get_friends,
        account::get_pending,
        account::send_friend_request,
        account::accept_friend_request,
        account::cancel_friend_request,
        account::remove_friend,
        guilds::create_guild,
        guilds::get_my_guilds,
        guilds::delete_guild,
        guilds::join_guild,
        guilds::leave_guild,
        guilds::get_bans,
        guilds::ban_member,
        guilds::unban_member,
        health::health_check,
        health::readiness_check,
    ),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        ChangePasswordRequest,
        ForgotPasswordRequest,
        ResetPasswordRequest,
        UpdateAccountForm,
        CreateGuildRequest,
        AccountResponse,
        PublicUserResponse,
        FriendResponse,
        PendingType,
        PendingRequestResponse,
        GuildResponse,
        HealthResponse,
        ReadinessResponse,
        HealthChecks,
        ErrorBody,
        ErrorResponse,
        FieldError,
    )),
    tags(
        (name = "account", description = "Registration, sessions, passwords and the account page"),
        (name = "friends", description = "Friend requests and the friends list"),
        (name = "guilds", description = "Guild membership and bans"),
        (name = "health", description = "Liveness and readiness checks")
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// The document with the security scheme pointing at the configured cookie
    pub fn with_cookie_name(cookie_name: &str) -> utoipa::openapi::OpenApi {
        let mut doc = Self::openapi();
        if let Some(components) = doc.components.as_mut() {
            components.add_security_scheme(SECURITY_SCHEME, cookie_scheme(cookie_name));
        }
        doc
    }
}
