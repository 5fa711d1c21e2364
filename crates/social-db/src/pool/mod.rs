//! Database connection pool management

mod migrations;
mod postgres;

pub use migrations::{migrations_dir, run_migrations, MigrationError};
pub use postgres::{create_pool, ping};

pub use sqlx::postgres::PgPool;
