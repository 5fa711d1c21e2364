//! # social-common
//!
//! Shared utilities: configuration, error handling, password hashing and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

pub use auth::{hash_password, verify_password};
pub use config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, Environment, MailConfig,
    RateLimitConfig, RedisConfig, ServerConfig, SessionConfig, SnowflakeConfig, StorageConfig,
};
pub use error::{AppError, AppResult, ErrorResponse, FieldError};
pub use telemetry::{try_init_tracing, TracingConfig, TracingError};
