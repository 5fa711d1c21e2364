//! Test fixtures and data generators

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique across runs against the same database
pub fn unique_suffix() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() % 1_000_000_000)
        .unwrap_or_default();
    format!("{nanos}{}", COUNTER.fetch_add(1, Ordering::SeqCst))
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        Self {
            // Stays under the 30 character limit
            username: format!("u{}", &suffix[suffix.len().saturating_sub(20)..]),
            email: format!("test{suffix}@example.com"),
            password: "TestPass123!".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn from_register(reg: &RegisterRequest) -> Self {
        Self {
            email: reg.email.clone(),
            password: reg.password.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub confirm_new_password: String,
}

#[derive(Debug, Serialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
    pub confirm_new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct AccountResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub image: String,
    pub is_online: bool,
}

#[derive(Debug, Deserialize)]
pub struct PublicUserResponse {
    pub id: String,
    pub username: String,
    pub image: String,
}

#[derive(Debug, Deserialize)]
pub struct FriendResponse {
    pub id: String,
    pub username: String,
    pub image: String,
    pub is_online: bool,
}

#[derive(Debug, Deserialize)]
pub struct PendingRequestResponse {
    pub id: String,
    pub username: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Serialize)]
pub struct CreateGuildRequest {
    pub name: String,
}

impl CreateGuildRequest {
    pub fn unique() -> Self {
        Self {
            name: format!("Test Guild {}", unique_suffix()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GuildResponse {
    pub id: String,
    pub name: String,
    pub owner_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub errors: Vec<FieldErrorBody>,
}

#[derive(Debug, Deserialize)]
pub struct FieldErrorBody {
    pub field: String,
    pub message: String,
}

impl ErrorResponse {
    /// Message attached to `field`, if any
    pub fn field(&self, field: &str) -> Option<&str> {
        self.error
            .errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}
