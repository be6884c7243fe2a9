//! HTTP server layer
//!
//! Axum server with:
//! - Permissive CORS
//! - Request tracing
//! - Graceful shutdown
//! - JSON envelopes for every outcome

pub mod envelope;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;
pub mod server;

pub use envelope::{DataEnvelope, ErrorEnvelope, ListEnvelope};
pub use error::ApiError;
pub use server::{build_router, log_storage_check, run_server, AppState, ServerError};
