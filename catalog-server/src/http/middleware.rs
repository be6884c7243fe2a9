//! Request/response middleware
//!
//! - `expose_diagnostics`: copies the [`Diagnostic`] detail into the
//!   error envelope as `message` when the environment allows it
//! - `handle_panic`: panic payload → 500 envelope

use std::any::Any;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::CONTENT_LENGTH;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::envelope::ErrorEnvelope;
use super::error::{ApiError, Diagnostic};
use super::server::AppState;

pub async fn expose_diagnostics(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let Some(Diagnostic { error, detail }) = response.extensions_mut().remove::<Diagnostic>()
    else {
        return response;
    };
    if !state.environment.exposes_diagnostics() {
        return response;
    }

    let (mut parts, _) = response.into_parts();
    let body = Json(ErrorEnvelope::new(error).with_message(detail))
        .into_response()
        .into_body();
    parts.headers.remove(CONTENT_LENGTH);
    Response::from_parts(parts, body)
}

pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "handler panicked".to_string()
    };

    ApiError::Internal { detail }.into_response()
}
