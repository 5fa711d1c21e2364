//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.
//! Field names are what the error map reports back to the client.

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

// ============================================================================
// Account Requests
// ============================================================================

/// Account registration
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email"))]
    pub email: String,

    #[validate(length(min = 3, max = 30, message = "Username must be between 3 and 30 characters"))]
    pub username: String,

    #[validate(length(min = 6, max = 150, message = "Password must be between 6 and 150 characters"))]
    pub password: String,
}

/// Login with email and password. No strength rules here, a wrong password
/// is reported as invalid credentials.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,

    #[validate(length(min = 6, max = 150, message = "Password must be between 6 and 150 characters"))]
    pub new_password: String,

    #[validate(must_match(other = "new_password", message = "Passwords do not match"))]
    pub confirm_new_password: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email"))]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,

    #[validate(length(min = 6, max = 150, message = "Password must be between 6 and 150 characters"))]
    pub new_password: String,

    #[validate(must_match(other = "new_password", message = "Passwords do not match"))]
    pub confirm_new_password: String,
}

/// Text fields of the multipart account form. The optional avatar travels
/// next to it as an `image` file part.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateAccountRequest {
    #[validate(email(message = "Invalid email"))]
    pub email: String,

    #[validate(length(min = 3, max = 30, message = "Username must be between 3 and 30 characters"))]
    pub username: String,
}

/// Schema of the multipart body, for the API document only
#[derive(Debug, ToSchema)]
pub struct UpdateAccountForm {
    pub email: String,
    pub username: String,
    /// Avatar image (png, jpeg, gif, webp, avif or bmp)
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<Vec<u8>>,
}

// ============================================================================
// Guild Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateGuildRequest {
    #[validate(length(min = 1, max = 100, message = "Guild name must be 1-100 characters"))]
    pub name: String,
}
