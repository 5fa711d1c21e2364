//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, Environment, MailConfig,
    RateLimitConfig, RedisConfig, ServerConfig, SessionConfig, SnowflakeConfig, StorageConfig,
};
