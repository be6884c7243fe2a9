//! Product endpoints

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use catalog_core::{CategoryStats, ListQuery, NewProduct, Product, ProductFields, ProductFilter, ProductPatch};

use super::route_not_found;
use crate::http::envelope::{DataEnvelope, ListEnvelope};
use crate::http::error::ApiError;
use crate::http::extractors::{JsonBody, ProductId};
use crate::http::server::AppState;

/// GET /api/products - list with optional category/minPrice/maxPrice
async fn list_products(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<ListEnvelope<Product>>, ApiError> {
    let Query(params) = query.map_err(|rejection| ApiError::Malformed {
        error: "Invalid query string",
        detail: rejection.body_text(),
    })?;
    let filter = ProductFilter::try_from(params)?;

    let products = state
        .store
        .list(&filter)
        .await
        .map_err(|e| ApiError::store(e, "Failed to fetch products"))?;

    Ok(Json(ListEnvelope::new(products)))
}

/// POST /api/products - create a product
async fn create_product(
    State(state): State<Arc<AppState>>,
    JsonBody(fields): JsonBody<ProductFields>,
) -> Result<(StatusCode, Json<DataEnvelope<Product>>), ApiError> {
    let input = NewProduct::new(fields)?;
    let product = state
        .store
        .create(input)
        .await
        .map_err(|e| ApiError::store(e, "Failed to create product"))?;

    tracing::info!(id = product.id, name = %product.name, "Product created");
    Ok((StatusCode::CREATED, Json(DataEnvelope::new(product))))
}

/// GET /api/products/stats - per-category aggregates
async fn product_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ListEnvelope<CategoryStats>>, ApiError> {
    let stats = state
        .store
        .stats()
        .await
        .map_err(|e| ApiError::store(e, "Failed to fetch product statistics"))?;

    Ok(Json(ListEnvelope::new(stats)))
}

/// GET /api/products/{id}
async fn get_product(
    State(state): State<Arc<AppState>>,
    ProductId(id): ProductId,
) -> Result<Json<DataEnvelope<Product>>, ApiError> {
    let product = state
        .store
        .get(id)
        .await
        .map_err(|e| ApiError::store(e, "Failed to fetch product"))?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(DataEnvelope::new(product)))
}

/// PUT /api/products/{id} - partial update
///
/// Storage failures here are reported as 400, unlike the other
/// operations.
async fn update_product(
    State(state): State<Arc<AppState>>,
    ProductId(id): ProductId,
    JsonBody(fields): JsonBody<ProductFields>,
) -> Result<Json<DataEnvelope<Product>>, ApiError> {
    let patch = ProductPatch::new(fields)?;
    patch.ensure_not_empty()?;

    let product = state
        .store
        .update(id, patch)
        .await
        .map_err(|e| {
            ApiError::store(e, "Failed to update product")
                .with_storage_status(StatusCode::BAD_REQUEST)
        })?
        .ok_or(ApiError::NotFound)?;

    tracing::info!(id, "Product updated");
    Ok(Json(DataEnvelope::new(product)))
}

/// DELETE /api/products/{id} - returns the removed record
async fn delete_product(
    State(state): State<Arc<AppState>>,
    ProductId(id): ProductId,
) -> Result<Json<DataEnvelope<Product>>, ApiError> {
    let product = state
        .store
        .delete(id)
        .await
        .map_err(|e| ApiError::store(e, "Failed to delete product"))?
        .ok_or(ApiError::NotFound)?;

    tracing::info!(id, "Product deleted");
    Ok(Json(DataEnvelope::new(product)))
}

/// Product routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/products",
            get(list_products)
                .post(create_product)
                .fallback(route_not_found),
        )
        .route(
            "/api/products/stats",
            get(product_stats).fallback(route_not_found),
        )
        .route(
            "/api/products/{id}",
            get(get_product)
                .put(update_product)
                .delete(delete_product)
                .fallback(route_not_found),
        )
}
