//! Database layer - connection pool and schema bootstrap
//!
//! # Design Principles
//!
//! - Bounded connection pool, lazily connected
//! - Every acquire is counted so health can report waiters
//! - One statement per operation; the engine's row atomicity is relied on

pub mod pool;
pub mod schema;

pub use pool::{create_pool, DatabaseConfig, PoolGauge, PoolStats};
pub use schema::ensure_schema;
