//! # social-db
//!
//! PostgreSQL implementations of the repository traits from `social-core`:
//! connection pool, schema migrations, `FromRow` models, model to entity
//! mappers and the repositories themselves.
//!
//! ```rust,ignore
//! let pool = social_db::create_pool(&config.database).await?;
//! social_db::run_migrations(&pool).await?;
//! let users = social_db::PgUserRepository::new(pool.clone());
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, migrations_dir, ping, run_migrations, MigrationError, PgPool};
pub use repositories::{
    PgBanRepository, PgFriendRepository, PgGuildRepository, PgUserRepository,
};
