//! Application configuration
//!
//! Everything comes from environment variables; a `.env` file in the working
//! directory is loaded first when present.

use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub session: SessionConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
    pub storage: StorageConfig,
    pub mail: MailConfig,
    pub snowflake: SnowflakeConfig,
}

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
    /// Public URL of the web client, used to build links in emails
    pub client_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" | "dev" => Ok(Self::Development),
            other => Err(format!("unknown environment {other:?}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Whole-request timeout applied by the middleware stack
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Apply pending migrations on startup
    pub run_migrations: bool,
}

#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
    pub max_connections: usize,
}

/// Session cookie settings
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub ttl_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub requests_per_second: u64,
    pub burst: u32,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub upload_dir: String,
    pub max_file_size_mb: u32,
    /// URL prefix the upload dir is served under
    pub public_path: String,
}

impl StorageConfig {
    #[must_use]
    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_mb as usize * 1024 * 1024
    }
}

/// SMTP settings. Without `smtp_host` mail is only logged.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub from_address: String,
    pub from_name: String,
}

impl MailConfig {
    #[must_use]
    pub fn is_mock(&self) -> bool {
        self.smtp_host.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct SnowflakeConfig {
    pub worker_id: u16,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a required variable is missing or a value does not parse
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let env: Environment = parsed_or("APP_ENV", Environment::Development)?;
        let worker_id = parsed_or("WORKER_ID", 0u16)?;
        if worker_id >= 1024 {
            return Err(ConfigError::InvalidValue("WORKER_ID", worker_id.to_string()));
        }

        Ok(Self {
            app: AppSettings {
                name: string_or("APP_NAME", "social-server"),
                env,
                client_url: string_or("CLIENT_URL", "http://localhost:3000")
                    .trim_end_matches('/')
                    .to_string(),
            },
            api: ServerConfig {
                host: string_or("API_HOST", "127.0.0.1"),
                port: parsed_or("API_PORT", 4000)?,
                request_timeout_secs: parsed_or("REQUEST_TIMEOUT_SECS", 30)?,
            },
            database: DatabaseConfig {
                url: required("DATABASE_URL")?,
                max_connections: parsed_or("DATABASE_MAX_CONNECTIONS", 20)?,
                min_connections: parsed_or("DATABASE_MIN_CONNECTIONS", 5)?,
                run_migrations: parsed_or("DATABASE_RUN_MIGRATIONS", true)?,
            },
            redis: RedisConfig {
                url: required("REDIS_URL")?,
                max_connections: parsed_or("REDIS_MAX_CONNECTIONS", 10)?,
            },
            session: SessionConfig {
                cookie_name: string_or("COOKIE_NAME", "qid"),
                ttl_seconds: parsed_or("SESSION_TTL_SECONDS", 60 * 60 * 24 * 7)?,
            },
            rate_limit: RateLimitConfig {
                enabled: parsed_or("RATE_LIMIT_ENABLED", true)?,
                requests_per_second: parsed_or("RATE_LIMIT_REQUESTS_PER_SECOND", 10)?,
                burst: parsed_or("RATE_LIMIT_BURST", 50)?,
            },
            cors: CorsConfig {
                allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            storage: StorageConfig {
                upload_dir: string_or("UPLOAD_DIR", "./uploads"),
                max_file_size_mb: parsed_or("MAX_FILE_SIZE_MB", 5)?,
                public_path: string_or("UPLOAD_PUBLIC_PATH", "/files"),
            },
            mail: MailConfig {
                smtp_host: optional("SMTP_HOST"),
                smtp_port: parsed_or("SMTP_PORT", 587)?,
                smtp_username: optional("SMTP_USERNAME"),
                smtp_password: optional("SMTP_PASSWORD"),
                from_address: string_or("MAIL_FROM_ADDRESS", "noreply@localhost"),
                from_name: string_or("MAIL_FROM_NAME", "Social"),
            },
            snowflake: SnowflakeConfig { worker_id },
        })
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    optional(key).ok_or(ConfigError::MissingVar(key))
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn string_or(key: &str, default: &str) -> String {
    optional(key).unwrap_or_else(|| default.to_string())
}

fn parsed_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match optional(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(default),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
