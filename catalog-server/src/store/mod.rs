//! Product storage - one interface, two backends
//!
//! The router is written once against [`ProductStore`]. Backends:
//! - [`MemoryStore`]: ordered map behind a lock, process-local
//! - [`PgStore`]: PostgreSQL through a bounded pool
//!
//! Absence is not an error: `get`, `update` and `delete` return
//! `Ok(None)` when the id does not exist.

pub mod memory;
pub mod postgres;
pub mod query;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use catalog_core::{CategoryStats, NewProduct, Product, ProductFilter, ProductPatch, ValidationError};
use chrono::{DateTime, Utc};

use crate::config::StorageConfig;
use crate::db::{self, PoolStats};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Storage error type
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Input violates a product invariant
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Uniqueness constraint violated
    #[error("{0}")]
    Conflict(String),

    /// Connectivity, syntax or unexpected engine failure
    #[error("database error: {0}")]
    Storage(#[from] sqlx::Error),
}

/// Which backend is serving
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Memory,
    Postgres,
}

impl StoreKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Postgres => "postgres",
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one diagnostic round-trip against storage
#[derive(Debug, Clone)]
pub struct StorageHealth {
    pub connected: bool,
    pub server_time: Option<DateTime<Utc>>,
    pub version: Option<String>,
    pub pool: Option<PoolStats>,
    pub error: Option<String>,
}

/// Product repository interface
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Backend identifier for logs and health.
    fn kind(&self) -> StoreKind;

    /// All products matching every criterion, newest first.
    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, StoreError>;

    /// Exact id lookup.
    async fn get(&self, id: i64) -> Result<Option<Product>, StoreError>;

    /// Insert, assigning id and both timestamps.
    async fn create(&self, input: NewProduct) -> Result<Product, StoreError>;

    /// Apply a sparse patch and refresh the update timestamp.
    ///
    /// An empty patch fails with [`ValidationError::NoFields`] and
    /// changes nothing. The HTTP layer rejects empty patches before
    /// calling this; backends check again for direct callers.
    async fn update(&self, id: i64, patch: ProductPatch) -> Result<Option<Product>, StoreError>;

    /// Remove and return the deleted snapshot.
    async fn delete(&self, id: i64) -> Result<Option<Product>, StoreError>;

    /// One aggregate row per category, most populous first.
    async fn stats(&self) -> Result<Vec<CategoryStats>, StoreError>;

    /// Diagnostic round-trip. `None` for backends without a remote
    /// collaborator.
    async fn health(&self) -> Option<StorageHealth>;

    /// Release storage resources. Called once on shutdown.
    async fn close(&self);
}

/// Build the configured backend.
///
/// The PostgreSQL pool connects lazily, so this succeeds while the
/// database is down unless schema bootstrap was requested.
pub async fn open_store(config: &StorageConfig) -> Result<Arc<dyn ProductStore>, StoreError> {
    match config {
        StorageConfig::Memory { seed } => {
            let store = if *seed {
                MemoryStore::with_sample_data()
            } else {
                MemoryStore::new()
            };
            Ok(Arc::new(store))
        }
        StorageConfig::Postgres {
            database,
            init_schema,
        } => {
            tracing::info!(target = %database.describe(), "Creating database pool");
            let pool = db::create_pool(database)?;
            if *init_schema {
                db::ensure_schema(&pool).await?;
            }
            Ok(Arc::new(PgStore::new(pool)))
        }
    }
}
