//! Server setup and initialization
//!
//! Provides the application builder and server runner.

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, Router};
use social_cache::RedisPool;
use social_common::{AppConfig, AppError};
use social_core::SnowflakeGenerator;
use social_db::{
    create_pool, run_migrations, PgBanRepository, PgFriendRepository, PgGuildRepository,
    PgUserRepository,
};
use social_service::{
    LocalFileStorage, LogMailer, Mailer, ServiceContextBuilder, ServiceSettings, SmtpMailer,
};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::middleware::{apply_common_layers, apply_middleware};
use crate::routes::{create_router, health_routes, public_routes};
use crate::state::AppState;

/// Room for multipart framing and the text fields around the avatar
const BODY_LIMIT_MARGIN: usize = 64 * 1024;

/// Build the complete Axum application with all routes and middleware
///
/// Health checks, static files and the docs skip the rate limiter.
pub fn create_app(state: AppState) -> Result<Router, AppError> {
    let config = state.config();
    let body_limit = config.storage.max_file_size_bytes() + BODY_LIMIT_MARGIN;

    let api = apply_middleware(create_router(), config)?
        .layer(DefaultBodyLimit::max(body_limit));

    let public = apply_common_layers(
        health_routes().merge(public_routes(&config.storage, &config.session.cookie_name)),
        config,
    );

    Ok(api.merge(public).with_state(state))
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&config.database)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    if config.database.run_migrations {
        run_migrations(&pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
    }

    info!("Connecting to Redis...");
    let redis_pool = RedisPool::from_config(&config.redis).map_err(|e| AppError::Cache(e.to_string()))?;
    if let Err(e) = redis_pool.health_check().await {
        warn!(error = %e, "Redis is not reachable yet");
    }

    let mailer: Arc<dyn Mailer> = if config.mail.is_mock() {
        info!("SMTP_HOST not set, emails will be logged instead of sent");
        Arc::new(LogMailer)
    } else {
        Arc::new(SmtpMailer::new(&config.mail).map_err(|e| AppError::Mail(e.to_string()))?)
    };

    let storage = Arc::new(LocalFileStorage::new(
        &config.storage.upload_dir,
        &config.storage.public_path,
    ));

    let settings = ServiceSettings {
        client_url: config.app.client_url.clone(),
        max_avatar_bytes: config.storage.max_file_size_bytes(),
    };

    let service_context = ServiceContextBuilder::new()
        .pool(pool.clone())
        .redis_pool(Arc::new(redis_pool))
        .user_repo(Arc::new(PgUserRepository::new(pool.clone())))
        .friend_repo(Arc::new(PgFriendRepository::new(pool.clone())))
        .guild_repo(Arc::new(PgGuildRepository::new(pool.clone())))
        .ban_repo(Arc::new(PgBanRepository::new(pool)))
        .session_ttl_seconds(config.session.ttl_seconds)
        .mailer(mailer)
        .storage(storage)
        .snowflake_generator(Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id)))
        .settings(settings)
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

/// Serve `app` on `listener` until Ctrl+C
pub async fn serve(listener: TcpListener, app: Router) -> Result<(), AppError> {
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.api.address();

    let state = create_app_state(config).await?;
    let app = create_app(state)?;

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);
    serve(listener, app).await
}
