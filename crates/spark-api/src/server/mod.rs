//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::sync::Arc;

use axum::Router;
use spark_common::{AppConfig, AppError, AppResult};
use spark_core::traits::{
    HealthProbe, MatchRepository, MessageRepository, ReactionRepository, UserRepository,
};
use spark_core::SnowflakeGenerator;
use spark_db::{
    apply_schema, create_pool, MemoryStore, PgHealthProbe, PgMatchRepository,
    PgMessageRepository, PgReactionRepository, PgUserRepository,
};
use spark_delivery::{ConnectionRegistry, DeliveryRouter, RouterSettings};
use spark_service::{MediaSettings, ServiceContextBuilder};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::middleware::apply_middleware_with_config;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Repositories backing one store
struct Storage {
    users: Arc<dyn UserRepository>,
    reactions: Arc<dyn ReactionRepository>,
    matches: Arc<dyn MatchRepository>,
    messages: Arc<dyn MessageRepository>,
    probe: Arc<dyn HealthProbe>,
}

impl Storage {
    fn memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            users: store.clone(),
            reactions: store.clone(),
            matches: store.clone(),
            messages: store.clone(),
            probe: store,
        }
    }

    async fn postgres(config: &AppConfig) -> AppResult<Self> {
        info!("Connecting to PostgreSQL...");
        let pool = create_pool(&config.database)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        apply_schema(&pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        info!("PostgreSQL connection established");

        Ok(Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            reactions: Arc::new(PgReactionRepository::new(pool.clone())),
            matches: Arc::new(PgMatchRepository::new(pool.clone())),
            messages: Arc::new(PgMessageRepository::new(pool.clone())),
            probe: Arc::new(PgHealthProbe::new(pool)),
        })
    }
}

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> AppResult<Router> {
    let config = state.config();
    let api = apply_middleware_with_config(
        create_router(config),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    )?;

    Ok(Router::new()
        .merge(health_routes())
        .merge(api)
        .with_state(state))
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> AppResult<AppState> {
    let storage = if config.database.is_in_memory() {
        warn!("Using the in-memory store; data is lost on restart");
        Storage::memory()
    } else {
        Storage::postgres(&config).await?
    };

    let router = DeliveryRouter::new(
        ConnectionRegistry::new(),
        Arc::clone(&storage.messages),
        RouterSettings {
            channel_buffer: config.delivery.channel_buffer,
            replay_page_size: config.delivery.replay_page_size,
        },
    );

    tokio::fs::create_dir_all(&config.storage.upload_dir).await?;

    let service_context = ServiceContextBuilder::new()
        .user_repo(storage.users)
        .reaction_repo(storage.reactions)
        .match_repo(storage.matches)
        .message_repo(storage.messages)
        .health_probe(storage.probe)
        .router(Arc::new(router))
        .snowflake_generator(Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id)))
        .media(MediaSettings::from(&config.storage))
        .build()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

/// Serve `app` on an already bound listener until ctrl-c
pub async fn run_server(app: Router, listener: TcpListener) -> AppResult<()> {
    info!("Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> AppResult<()> {
    let addr = config.server.address();

    let state = create_app_state(config).await?;
    let app = create_app(state)?;

    info!("Starting HTTP server on {}", addr);
    let listener = TcpListener::bind(addr.as_str()).await?;

    run_server(app, listener).await
}
