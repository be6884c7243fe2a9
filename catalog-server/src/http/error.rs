//! API error types with IntoResponse
//!
//! Errors are converted to `{ success: false, error }` envelopes with the
//! matching status code. Failures that carry an underlying diagnostic
//! attach it as a [`Diagnostic`] response extension; whether it reaches
//! the client is decided by the diagnostics middleware.

use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use catalog_core::ValidationError;

use super::envelope::ErrorEnvelope;
use crate::store::StoreError;

/// Underlying failure detail, kept out of the body until the
/// environment allows it
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Client-facing error text already in the body
    pub error: String,
    pub detail: String,
}

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Body or query could not be parsed (400)
    Malformed {
        error: &'static str,
        detail: String,
    },

    /// Body exceeded the configured cap (413)
    PayloadTooLarge,

    /// Validation failed (400)
    Validation(ValidationError),

    /// Uniqueness violated (400)
    Conflict(String),

    /// Product id absent (404, not logged)
    NotFound,

    /// No route for this method and path (404)
    RouteNotFound { method: Method, path: String },

    /// Storage failure (500 unless overridden, logged)
    Storage {
        status: StatusCode,
        error: &'static str,
        detail: String,
    },

    /// Internal error (500, logged)
    Internal { detail: String },
}

impl ApiError {
    pub fn route_not_found(method: &Method, path: &str) -> Self {
        Self::RouteNotFound {
            method: method.clone(),
            path: path.to_owned(),
        }
    }

    /// Map a store failure, naming the operation for storage errors.
    pub fn store(err: StoreError, failure: &'static str) -> Self {
        match err {
            StoreError::Validation(e) => Self::Validation(e),
            StoreError::Conflict(message) => Self::Conflict(message),
            StoreError::Storage(e) => Self::Storage {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: failure,
                detail: e.to_string(),
            },
        }
    }

    /// Override the status of a storage failure; other variants keep
    /// theirs.
    pub fn with_storage_status(self, status: StatusCode) -> Self {
        match self {
            Self::Storage { error, detail, .. } => Self::Storage {
                status,
                error,
                detail,
            },
            other => other,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Malformed { .. } | Self::Validation(_) | Self::Conflict(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::NotFound | Self::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            Self::Storage { status, .. } => *status,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error, detail) = match self {
            Self::Malformed { error, detail } => (error.to_string(), Some(detail)),
            Self::PayloadTooLarge => ("Request body too large".to_string(), None),
            Self::Validation(e) => (e.to_string(), None),
            Self::Conflict(message) => (message, None),
            Self::NotFound => ("Product not found".to_string(), None),
            Self::RouteNotFound { method, path } => {
                (format!("Route {} {} not found", method, path), None)
            }
            Self::Storage { error, detail, .. } => {
                // Log the actual error, return generic message
                tracing::error!(failure = error, "Storage error: {}", detail);
                (error.to_string(), Some(detail))
            }
            Self::Internal { detail } => {
                tracing::error!("Internal error: {}", detail);
                ("Internal server error".to_string(), Some(detail))
            }
        };

        let mut response = (status, Json(ErrorEnvelope::new(error.clone()))).into_response();
        if let Some(detail) = detail {
            response
                .extensions_mut()
                .insert(Diagnostic { error, detail });
        }
        response
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}
