//! Axum server setup
//!
//! Server skeleton with:
//! - Permissive CORS and JSON content type on every response
//! - Request tracing
//! - Panic capture and body size cap
//! - Graceful shutdown on SIGTERM/Ctrl+C, then storage close

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderValue;
use axum::middleware::from_fn_with_state;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use super::{middleware, routes};
use crate::config::{Environment, ServerConfig};
use crate::store::ProductStore;

/// Shared application state
pub struct AppState {
    pub store: Arc<dyn ProductStore>,
    /// Decides whether error envelopes carry diagnostics
    pub environment: Environment,
}

/// Build the full application router.
///
/// Layer order, outermost first: trace, content type, CORS (answers
/// every OPTIONS request), diagnostics, panic capture, body limit.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let state = Arc::new(state);

    Router::new()
        .merge(routes::health::router())
        .merge(routes::products::router())
        .fallback(routes::route_not_found)
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(CatchPanicLayer::custom(middleware::handle_panic))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::expose_diagnostics,
        ))
        .layer(CorsLayer::permissive())
        .layer(SetResponseHeaderLayer::if_not_present(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Log the outcome of one storage round-trip. Never fails.
pub async fn log_storage_check(store: &dyn ProductStore) {
    match store.health().await {
        None => tracing::info!(storage = %store.kind(), "Using process-local storage"),
        Some(h) if h.connected => tracing::info!(
            storage = %store.kind(),
            server_time = ?h.server_time,
            version = h.version.as_deref().unwrap_or("unknown"),
            "Database connected"
        ),
        Some(h) => tracing::warn!(
            storage = %store.kind(),
            error = h.error.as_deref().unwrap_or("unknown"),
            "Database unreachable at startup, serving anyway"
        ),
    }
}

/// Run the HTTP server until a shutdown signal, then close storage.
///
/// # Example
///
/// ```ignore
/// let store = open_store(&StorageConfig::Memory { seed: true }).await?;
/// run_server(store, ServerConfig::default()).await?;
/// ```
pub async fn run_server(
    store: Arc<dyn ProductStore>,
    config: ServerConfig,
) -> Result<(), ServerError> {
    log_storage_check(store.as_ref()).await;

    let state = AppState {
        store: Arc::clone(&store),
        environment: config.environment,
    };
    let app = build_router(state, &config);

    // Bind listener
    let listener = match TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            store.close().await;
            return Err(e.into());
        }
    };
    tracing::info!(
        environment = %config.environment,
        storage = %store.kind(),
        "Server listening on {}",
        config.bind_addr
    );

    // Run with graceful shutdown
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    store.close().await;
    served?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
