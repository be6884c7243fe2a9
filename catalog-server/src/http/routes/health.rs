//! Health check endpoint

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::http::server::AppState;
use crate::store::StorageHealth;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub timestamp: DateTime<Utc>,
    pub version: &'static str,
    /// Present only for backends with a remote collaborator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseHealth>,
    pub environment: &'static str,
}

/// Storage section of the health report
#[derive(Debug, Serialize)]
pub struct DatabaseHealth {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_total: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_idle: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_waiting: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<StorageHealth> for DatabaseHealth {
    fn from(h: StorageHealth) -> Self {
        Self {
            status: if h.connected { "connected" } else { "disconnected" },
            server_time: h.server_time,
            version: h.version,
            pool_total: h.pool.map(|p| p.total),
            pool_idle: h.pool.map(|p| p.idle),
            pool_waiting: h.pool.map(|p| p.waiting),
            error: h.error,
        }
    }
}

/// GET /health
///
/// Always 200 while the process serves; storage trouble is reported
/// inline.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let database = state.store.health().await.map(DatabaseHealth::from);

    Json(HealthResponse {
        status: "healthy",
        service: "product-service",
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION"),
        database,
        environment: state.environment.as_str(),
    })
}

/// Health routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health).fallback(super::route_not_found))
}
