//! PostgreSQL product store
//!
//! Handles product CRUD with these patterns:
//! - one statement per operation (`... RETURNING`), no check-then-write
//! - rely on DB constraints and map violations to typed errors
//! - every connection is acquired through the pool gauge and returned
//!   to the pool on drop, on success and failure alike

use async_trait::async_trait;
use catalog_core::{
    CategoryStats, Decimal, NewProduct, Product, ProductFilter, ProductPatch, ValidationError,
};
use chrono::{DateTime, Utc};
use sqlx::pool::PoolConnection;
use sqlx::{FromRow, PgPool, Postgres};

use super::query::{self, PRODUCT_COLUMNS};
use super::{ProductStore, StorageHealth, StoreError, StoreKind};
use crate::db::PoolGauge;

/// Product row from database
#[derive(Debug, Clone, FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    description: String,
    price: Decimal,
    category: String,
    stock: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(r: ProductRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            description: r.description,
            price: r.price,
            category: r.category,
            stock: r.stock,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Aggregate row from the stats query
#[derive(Debug, Clone, FromRow)]
struct StatsRow {
    category: String,
    count: i64,
    average_price: Decimal,
    total_stock: i64,
    min_price: Decimal,
    max_price: Decimal,
}

impl From<StatsRow> for CategoryStats {
    fn from(r: StatsRow) -> Self {
        Self {
            category: r.category,
            count: r.count,
            average_price: r.average_price,
            total_stock: r.total_stock,
            min_price: r.min_price,
            max_price: r.max_price,
        }
    }
}

/// Pool-backed product store
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
    gauge: PoolGauge,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            gauge: PoolGauge::new(),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn acquire(&self) -> Result<PoolConnection<Postgres>, StoreError> {
        Ok(self.gauge.acquire(&self.pool).await?)
    }
}

/// Map constraint violations on insert/update to typed errors.
fn map_write_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return StoreError::Conflict("A product with this name already exists".to_string());
        }
        if db.is_check_violation() {
            match db.constraint() {
                Some(c) if c.contains("price") => {
                    return ValidationError::NonPositivePrice.into();
                }
                Some(c) if c.contains("stock") => {
                    return ValidationError::NegativeStock.into();
                }
                _ => {}
            }
        }
    }
    StoreError::Storage(err)
}

#[async_trait]
impl ProductStore for PgStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Postgres
    }

    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, StoreError> {
        let mut conn = self.acquire().await?;
        let mut builder = query::select_products(filter);

        let rows: Vec<ProductRow> = builder
            .build_query_as()
            .fetch_all(&mut *conn)
            .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Product>, StoreError> {
        let mut conn = self.acquire().await?;

        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(row.map(Product::from))
    }

    async fn create(&self, input: NewProduct) -> Result<Product, StoreError> {
        let mut conn = self.acquire().await?;

        let row: ProductRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO products (name, description, price, category, stock)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(input.name())
        .bind(input.description())
        .bind(input.price())
        .bind(input.category())
        .bind(input.stock())
        .fetch_one(&mut *conn)
        .await
        .map_err(map_write_error)?;

        tracing::debug!(id = row.id, "Product created");
        Ok(row.into())
    }

    async fn update(&self, id: i64, patch: ProductPatch) -> Result<Option<Product>, StoreError> {
        patch.ensure_not_empty()?;

        let mut conn = self.acquire().await?;
        let mut builder = query::update_product(id, &patch);

        let row: Option<ProductRow> = builder
            .build_query_as()
            .fetch_optional(&mut *conn)
            .await
            .map_err(map_write_error)?;

        Ok(row.map(Product::from))
    }

    async fn delete(&self, id: i64) -> Result<Option<Product>, StoreError> {
        let mut conn = self.acquire().await?;

        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "DELETE FROM products WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(row.map(Product::from))
    }

    async fn stats(&self) -> Result<Vec<CategoryStats>, StoreError> {
        let mut conn = self.acquire().await?;

        let rows: Vec<StatsRow> = sqlx::query_as(
            r#"
            SELECT
                category,
                COUNT(*) AS count,
                ROUND(AVG(price), 2) AS average_price,
                COALESCE(SUM(stock), 0)::BIGINT AS total_stock,
                MIN(price) AS min_price,
                MAX(price) AS max_price
            FROM products
            GROUP BY category
            ORDER BY count DESC, category ASC
            "#,
        )
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows.into_iter().map(CategoryStats::from).collect())
    }

    async fn health(&self) -> Option<StorageHealth> {
        let probe = async {
            let mut conn = self.gauge.acquire(&self.pool).await?;
            sqlx::query_as::<_, (DateTime<Utc>, String)>("SELECT NOW(), version()")
                .fetch_one(&mut *conn)
                .await
        };

        let health = match probe.await {
            Ok((server_time, version)) => StorageHealth {
                connected: true,
                server_time: Some(server_time),
                version: Some(version),
                pool: None,
                error: None,
            },
            Err(e) => {
                tracing::warn!(error = %e, "Database health check failed");
                StorageHealth {
                    connected: false,
                    server_time: None,
                    version: None,
                    pool: None,
                    error: Some(e.to_string()),
                }
            }
        };

        Some(StorageHealth {
            pool: Some(self.gauge.stats(&self.pool)),
            ..health
        })
    }

    async fn close(&self) {
        tracing::info!("Closing database pool");
        self.pool.close().await;
    }
}
