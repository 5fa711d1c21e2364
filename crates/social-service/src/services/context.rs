//! Service context - dependency container for services
//!
//! Holds the repositories, Redis stores and side channels (mail, file
//! storage) the services need.

use std::sync::Arc;

use social_cache::{PasswordResetStore, SessionStore, SharedRedisPool};
use social_core::traits::{BanRepository, FriendRepository, GuildRepository, UserRepository};
use social_core::{Snowflake, SnowflakeGenerator};
use social_db::PgPool;

use crate::mail::Mailer;
use crate::storage::FileStorage;

use super::error::{ServiceError, ServiceResult};
use super::tokens::{ResetTokens, SessionRevoker};

/// Plain settings the services read
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Base URL of the web client, used to build links in emails
    pub client_url: String,
    /// Largest accepted avatar upload
    pub max_avatar_bytes: usize,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            client_url: "http://localhost:3000".to_string(),
            max_avatar_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    pool: PgPool,
    redis_pool: SharedRedisPool,

    // Repositories
    user_repo: Arc<dyn UserRepository>,
    friend_repo: Arc<dyn FriendRepository>,
    guild_repo: Arc<dyn GuildRepository>,
    ban_repo: Arc<dyn BanRepository>,

    // Cache stores
    session_store: SessionStore,
    session_revoker: Arc<dyn SessionRevoker>,
    reset_tokens: Arc<dyn ResetTokens>,

    // Side channels
    mailer: Arc<dyn Mailer>,
    storage: Arc<dyn FileStorage>,

    snowflake_generator: Arc<SnowflakeGenerator>,
    settings: ServiceSettings,
}

impl ServiceContext {
    // === Pools ===

    /// Get the PostgreSQL connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Get the Redis connection pool
    pub fn redis_pool(&self) -> &SharedRedisPool {
        &self.redis_pool
    }

    // === Repositories ===

    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    pub fn friend_repo(&self) -> &dyn FriendRepository {
        self.friend_repo.as_ref()
    }

    pub fn guild_repo(&self) -> &dyn GuildRepository {
        self.guild_repo.as_ref()
    }

    pub fn ban_repo(&self) -> &dyn BanRepository {
        self.ban_repo.as_ref()
    }

    // === Cache Stores ===

    pub fn session_store(&self) -> &SessionStore {
        &self.session_store
    }

    pub fn session_revoker(&self) -> &dyn SessionRevoker {
        self.session_revoker.as_ref()
    }

    pub fn reset_tokens(&self) -> &dyn ResetTokens {
        self.reset_tokens.as_ref()
    }

    // === Side channels ===

    pub fn mailer(&self) -> &dyn Mailer {
        self.mailer.as_ref()
    }

    pub fn storage(&self) -> &dyn FileStorage {
        self.storage.as_ref()
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("pool", &"PgPool")
            .field("redis_pool", &"SharedRedisPool")
            .field("repositories", &"...")
            .field("worker_id", &self.snowflake_generator.worker_id())
            .field("settings", &self.settings)
            .finish()
    }
}

/// Builder for [`ServiceContext`]
#[derive(Default)]
pub struct ServiceContextBuilder {
    pool: Option<PgPool>,
    redis_pool: Option<SharedRedisPool>,
    user_repo: Option<Arc<dyn UserRepository>>,
    friend_repo: Option<Arc<dyn FriendRepository>>,
    guild_repo: Option<Arc<dyn GuildRepository>>,
    ban_repo: Option<Arc<dyn BanRepository>>,
    session_ttl_seconds: Option<u64>,
    session_revoker: Option<Arc<dyn SessionRevoker>>,
    reset_tokens: Option<Arc<dyn ResetTokens>>,
    mailer: Option<Arc<dyn Mailer>>,
    storage: Option<Arc<dyn FileStorage>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    settings: ServiceSettings,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn redis_pool(mut self, redis_pool: SharedRedisPool) -> Self {
        self.redis_pool = Some(redis_pool);
        self
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn friend_repo(mut self, repo: Arc<dyn FriendRepository>) -> Self {
        self.friend_repo = Some(repo);
        self
    }

    pub fn guild_repo(mut self, repo: Arc<dyn GuildRepository>) -> Self {
        self.guild_repo = Some(repo);
        self
    }

    pub fn ban_repo(mut self, repo: Arc<dyn BanRepository>) -> Self {
        self.ban_repo = Some(repo);
        self
    }

    pub fn session_ttl_seconds(mut self, ttl: u64) -> Self {
        self.session_ttl_seconds = Some(ttl);
        self
    }

    /// Replace the Redis session store for bulk revocation
    pub fn session_revoker(mut self, revoker: Arc<dyn SessionRevoker>) -> Self {
        self.session_revoker = Some(revoker);
        self
    }

    /// Replace the Redis password reset store
    pub fn reset_tokens(mut self, tokens: Arc<dyn ResetTokens>) -> Self {
        self.reset_tokens = Some(tokens);
        self
    }

    pub fn mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = Some(mailer);
        self
    }

    pub fn storage(mut self, storage: Arc<dyn FileStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn settings(mut self, settings: ServiceSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        fn required<T>(value: Option<T>, name: &str) -> ServiceResult<T> {
            value.ok_or_else(|| ServiceError::validation(format!("{name} is required")))
        }

        let redis_pool = required(self.redis_pool, "redis_pool")?;
        let inner_pool = (*redis_pool).clone();
        let session_store = SessionStore::new(
            inner_pool.clone(),
            required(self.session_ttl_seconds, "session_ttl_seconds")?,
        );
        let session_revoker: Arc<dyn SessionRevoker> = match self.session_revoker {
            Some(revoker) => revoker,
            None => Arc::new(session_store.clone()),
        };
        let reset_tokens: Arc<dyn ResetTokens> = match self.reset_tokens {
            Some(tokens) => tokens,
            None => Arc::new(PasswordResetStore::new(inner_pool)),
        };

        Ok(ServiceContext {
            pool: required(self.pool, "pool")?,
            redis_pool,
            user_repo: required(self.user_repo, "user_repo")?,
            friend_repo: required(self.friend_repo, "friend_repo")?,
            guild_repo: required(self.guild_repo, "guild_repo")?,
            ban_repo: required(self.ban_repo, "ban_repo")?,
            session_store,
            session_revoker,
            reset_tokens,
            mailer: required(self.mailer, "mailer")?,
            storage: required(self.storage, "storage")?,
            snowflake_generator: required(self.snowflake_generator, "snowflake_generator")?,
            settings: self.settings,
        })
    }
}
