//! Gateway server setup
//!
//! Provides the main WebSocket server configuration and routes.

mod handler;
mod state;

pub use handler::gateway_handler;
pub use state::GatewayState;

use crate::connection::ConnectionRegistry;
use crate::dispatch::PushDispatcher;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Router};
use forum_common::{AppConfig, AppError, TokenVerifier};
use forum_core::SnowflakeGenerator;
use forum_service::{EntityLocks, FanoutCoordinator, ServiceContextBuilder};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Create the gateway router
pub fn create_router() -> Router<GatewayState> {
    Router::new()
        .route("/gateway", get(gateway_handler))
        .route("/health", get(health_check))
}

/// Health check endpoint
async fn health_check(State(state): State<GatewayState>) -> (StatusCode, &'static str) {
    match forum_db::health_check(state.service_context().pool()).await {
        Ok(()) => (StatusCode::OK, "OK"),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "database unavailable")
        }
    }
}

/// Build the complete application
pub fn create_app(state: GatewayState) -> Router {
    create_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Initialize all dependencies and create `GatewayState`
pub async fn create_gateway_state(config: AppConfig) -> Result<GatewayState, AppError> {
    // Create database pool
    tracing::info!("Connecting to PostgreSQL...");
    let pool = forum_db::create_pool(&config.database)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    tracing::info!("PostgreSQL connection established");

    // Create Snowflake generator
    let snowflake_generator = Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id));

    // Create repositories
    let post_repo = Arc::new(forum_db::PgPostRepository::new(pool.clone()));
    let comment_repo = Arc::new(forum_db::PgCommentRepository::new(pool.clone()));
    let team_repo = Arc::new(forum_db::PgTeamRepository::new(pool.clone()));
    let notification_repo = Arc::new(forum_db::PgNotificationRepository::new(pool.clone()));

    // Per-entity mutation locks and the fan-out queue
    let entity_locks = EntityLocks::new(Duration::from_millis(config.fanout.lock_wait_ms));
    let (fanout, push_rx) = FanoutCoordinator::new(
        notification_repo.clone(),
        snowflake_generator.clone(),
        config.fanout.queue_capacity,
    );

    // Build service context
    let service_context = ServiceContextBuilder::new()
        .pool(pool)
        .post_repo(post_repo)
        .comment_repo(comment_repo)
        .team_repo(team_repo)
        .notification_repo(notification_repo)
        .entity_locks(entity_locks)
        .fanout(fanout)
        .snowflake_generator(snowflake_generator)
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    // Create connection registry
    let registry = ConnectionRegistry::new_shared();

    // Start the push dispatcher on the fan-out queue
    let dispatcher = Arc::new(PushDispatcher::new(registry.clone()));
    dispatcher.clone().start(push_rx);

    // Handshake token verification
    let verifier = TokenVerifier::new(&config.auth.secret);

    Ok(GatewayState::new(
        service_context,
        registry,
        dispatcher,
        verifier,
        config,
    ))
}

/// Run the gateway server
pub async fn run_server(app: Router, addr: SocketAddr, state: GatewayState) -> Result<(), AppError> {
    tracing::info!("Starting gateway server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    tracing::info!("Gateway listening on ws://{}/gateway", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    tracing::info!("Gateway stopped");
    Ok(())
}

/// Wait for ctrl-c, then drain every live connection
async fn shutdown_signal(state: GatewayState) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }

    tracing::info!(
        connections = state.registry().connection_count(),
        "Shutdown signal received; draining connections"
    );
    state.dispatcher().stop();
    state.begin_shutdown();
}

/// Run the complete gateway server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.gateway.port));

    // Create gateway state
    let state = create_gateway_state(config).await?;

    // Build application
    let app = create_app(state.clone());

    // Run server
    run_server(app, addr, state).await
}
