//! Static Server
//!
//! Serves the dashboard page and its datasets so that the relative
//! `data/datasets/*.json` fetches resolve.
//!
//! # Endpoints
//!
//! - `GET /data/...` - Files under the data root
//! - `GET /health/live` - Liveness probe
//! - `GET /health` - Dataset presence and uptime
//! - everything else - Files under the static directory (`index.html` for `/`)

pub mod error;
pub mod health;
pub mod state;

pub use error::{ServerError, ServerResult};
pub use state::ServerState;

use axum::{routing::get, Router};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::config::ServerConfig;

/// Build the router with all routes and middleware
pub fn build_router(state: ServerState) -> Router {
    let health_routes = Router::new()
        .route("/live", get(health::liveness))
        .route("/", get(health::full_health));

    let data = ServeDir::new(&state.data_root);
    let site = ServeDir::new(&state.static_dir);

    Router::new()
        .nest("/health", health_routes)
        .nest_service("/data", data)
        .fallback_service(site)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// Bind to the configured address and serve until Ctrl+C or SIGTERM
pub async fn serve(state: ServerState, config: &ServerConfig) -> ServerResult<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;

    serve_on(listener, state, shutdown_signal()).await
}

/// Serve on an already bound listener until `shutdown` resolves
pub async fn serve_on<F>(listener: TcpListener, state: ServerState, shutdown: F) -> ServerResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    tracing::info!(
        addr = %addr,
        static_dir = %state.static_dir.display(),
        data_root = %state.data_root.display(),
        "SIC3PRO dashboard listening"
    );

    let router = build_router(state);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
