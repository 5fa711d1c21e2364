//! Data transfer objects for API requests and responses
//!
//! - Request DTOs with validation rules
//! - Response DTOs for serializing API outputs
//! - Mappers from domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    ChangePasswordRequest, CreateGuildRequest, ForgotPasswordRequest, LoginRequest,
    RegisterRequest, ResetPasswordRequest, UpdateAccountForm, UpdateAccountRequest,
};

pub use responses::{
    AccountResponse, FriendResponse, GuildResponse, HealthChecks, HealthResponse,
    PendingRequestResponse, PendingType, PublicUserResponse, ReadinessResponse,
};
