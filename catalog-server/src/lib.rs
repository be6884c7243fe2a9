//! catalog-server: HTTP service for the product catalog
//!
//! One router written against the [`ProductStore`] interface, served
//! over either a process-local store or a PostgreSQL pool.

pub mod config;
pub mod db;
pub mod http;
pub mod store;

pub use config::{Environment, ServerConfig, StorageConfig};
pub use db::DatabaseConfig;
pub use http::{build_router, run_server, AppState, ServerError};
pub use store::{open_store, MemoryStore, PgStore, ProductStore, StoreError, StoreKind};
