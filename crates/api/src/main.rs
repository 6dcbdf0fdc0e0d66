use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use persona_api::config::ServerConfig;
use persona_api::router::build_app_router;
use persona_api::state::AppState;
use persona_core::config::Settings;
use persona_pipeline::store::PgJobStore;
use persona_pipeline::PipelineRunner;
use persona_worker::TaskQueue;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "persona_api=debug,persona_pipeline=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    let settings = Settings::from_env();
    settings
        .ensure_directories()
        .expect("Failed to create storage directories");
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let pool = persona_db::create_pool(&settings.database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    persona_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    persona_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Pipeline and queue ---
    let store = Arc::new(PgJobStore::new(pool.clone()));
    let worker_count = settings.worker_count;
    let runner = Arc::new(PipelineRunner::with_default_stages(
        store.clone(),
        settings,
    ));
    let queue = TaskQueue::new(runner, worker_count);
    tracing::info!(worker_count, "Task queue started");

    // --- Router ---
    let state = AppState {
        store,
        queue: queue.clone(),
        pool: Some(pool),
        config: Arc::new(config.clone()),
    };
    let app = build_app_router(state, &config);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid host/port configuration");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");
    tracing::info!(%addr, "Avatar pipeline API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // Let in-flight jobs reach a terminal state before exiting.
    queue.shutdown().await;
    tracing::info!("Shutdown complete");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
