//! Route handlers organized by resource

pub mod health;
pub mod products;

use axum::http::{Method, Uri};

use super::error::ApiError;

/// Fallback for unknown paths and for methods a path does not serve.
pub async fn route_not_found(method: Method, uri: Uri) -> ApiError {
    ApiError::route_not_found(&method, uri.path())
}
