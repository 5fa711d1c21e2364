//! Schema migrations
//!
//! The SQL files live in this crate's `migrations/` directory and are read at
//! runtime, so no database is needed at compile time.

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::PgPool;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("failed to load migrations from {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: MigrateError,
    },

    #[error("failed to apply migrations: {0}")]
    Apply(#[from] MigrateError),
}

/// `MIGRATIONS_DIR` if set, otherwise the directory shipped with this crate
pub fn migrations_dir() -> PathBuf {
    std::env::var_os("MIGRATIONS_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations"))
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrationError> {
    let dir = migrations_dir();
    let migrator = Migrator::new(dir.clone())
        .await
        .map_err(|source| MigrationError::Load {
            path: dir.display().to_string(),
            source,
        })?;

    migrator.run(pool).await?;
    info!(count = migrator.iter().count(), "database migrations applied");
    Ok(())
}
