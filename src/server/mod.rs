pub mod client;
pub mod error;
pub mod routes;
pub mod store;

pub use self::store::{ConfigPatch, ConfigSnapshot, ConfigStore};

use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Configs carry inline images, so bodies get a generous cap.
pub const BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

pub struct AppState {
    pub store: ConfigStore,
}

impl AppState {
    pub fn new(store: ConfigStore) -> Self {
        Self { store }
    }
}

pub fn config_routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/api/config",
        get(routes::get_config).post(routes::update_config),
    )
}

pub fn system_routes() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(routes::health))
}

pub fn app(state: Arc<AppState>, static_dir: Option<PathBuf>) -> Router {
    let mut router = system_routes().merge(config_routes());

    if let Some(dir) = static_dir {
        info!("Serving static files from {:?}", dir);
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Runs the config service until ctrl-c. The store is dropped with the
/// router once the server has drained.
pub async fn serve(addr: SocketAddr, store: ConfigStore, static_dir: Option<PathBuf>) -> std::io::Result<()> {
    let state = Arc::new(AppState::new(store));
    let app = app(state, static_dir);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Config service listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Config service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for ctrl-c: {}", e);
    }
}
