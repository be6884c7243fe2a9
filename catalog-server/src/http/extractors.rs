//! Custom Axum extractors

use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::http::StatusCode;
use serde::de::DeserializeOwned;

use super::error::ApiError;

/// Numeric product id from the `{id}` path segment.
///
/// Anything other than plain digits does not name a product route, so
/// the rejection is the unmatched-route 404 rather than a 400.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductId(pub i64);

impl<S> FromRequestParts<S> for ProductId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let not_found = ApiError::route_not_found(&parts.method, parts.uri.path());

        let Path(raw): Path<String> = match Path::from_request_parts(parts, state).await {
            Ok(path) => path,
            Err(_) => return Err(not_found),
        };

        parse_id(&raw).map(Self).ok_or(not_found)
    }
}

fn parse_id(raw: &str) -> Option<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// JSON body that ignores `content-type` and maps failures onto the
/// service's envelopes: oversized bodies → 413, unparsable → 400.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                ApiError::PayloadTooLarge
            } else {
                ApiError::Malformed {
                    error: "Invalid JSON in request body",
                    detail: rejection.body_text(),
                }
            }
        })?;

        serde_json::from_slice(&bytes)
            .map(Self)
            .map_err(|e| ApiError::Malformed {
                error: "Invalid JSON in request body",
                detail: e.to_string(),
            })
    }
}
