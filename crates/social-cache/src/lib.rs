//! # social-cache
//!
//! Redis-backed state that does not belong in PostgreSQL:
//!
//! - **Connection pool**: deadpool managed connections with JSON helpers
//! - **Sessions**: the id stored in the session cookie maps to a user
//! - **Password reset**: single-use tokens mailed to users
//!
//! ```ignore
//! let pool = RedisPool::from_config(&config.redis)?;
//! let sessions = SessionStore::new(pool.clone(), config.session.ttl_seconds);
//! let session_id = sessions.create(user.id).await?;
//! ```

pub mod password_reset;
pub mod pool;
pub mod session;

pub use password_reset::{PasswordResetStore, FORGET_PASSWORD_PREFIX, RESET_TOKEN_TTL};
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult, SharedRedisPool};
pub use session::{SessionData, SessionStore};
