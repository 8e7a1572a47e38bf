use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use stride_api::config::{ServerConfig, StoreBackend};
use stride_api::router::build_app_router;
use stride_api::services::items::ItemService;
use stride_api::services::link_preview::HttpLinkPreviewer;
use stride_api::state::AppState;
use stride_db::store::{ItemStore, MemoryItemStore, PgItemStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stride_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        store = ?config.store_backend,
        "Loaded server configuration"
    );

    let store = connect_store(&config).await;

    let previewer = HttpLinkPreviewer::new(Duration::from_secs(config.link_preview_timeout_secs))
        .expect("Failed to build link preview HTTP client");

    let state = AppState {
        config: Arc::new(config.clone()),
        items: ItemService::new(store, Arc::new(previewer)),
    };

    let app = build_app_router(state, &config);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid HOST:PORT");
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Open the configured item store. Postgres is health-checked and migrated
/// before the server accepts traffic.
async fn connect_store(config: &ServerConfig) -> Arc<dyn ItemStore> {
    match config.store_backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory item store; data is lost on restart");
            Arc::new(MemoryItemStore::new())
        }
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .expect("DATABASE_URL must be set when STORE_BACKEND=postgres");

            let pool = stride_db::create_pool(database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            stride_db::health_check(&pool)
                .await
                .expect("Database health check failed");

            stride_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            Arc::new(PgItemStore::new(pool))
        }
    }
}

/// Resolves on SIGINT, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
