//! In-memory product store
//!
//! An ordered map behind a single `RwLock`. Every mutation holds the
//! write lock, so concurrent update/delete on the same id are
//! serialized rather than racing.

use std::collections::BTreeMap;

use async_trait::async_trait;
use catalog_core::{
    sort_newest_first, CategoryStats, Decimal, NewProduct, Product, ProductFilter, ProductPatch,
};
use chrono::Utc;
use tokio::sync::RwLock;

use super::{ProductStore, StorageHealth, StoreError, StoreKind};

/// Process-local product store
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inventory>,
}

#[derive(Debug, Default)]
struct Inventory {
    products: BTreeMap<i64, Product>,
    /// Highest id ever assigned; ids are never reused after a delete
    last_id: i64,
}

impl Inventory {
    fn name_taken(&self, name: &str, except: Option<i64>) -> bool {
        self.products
            .values()
            .any(|p| p.name == name && Some(p.id) != except)
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with a handful of sample products.
    pub fn with_sample_data() -> Self {
        const SAMPLES: &[(&str, &str, i64, &str, i32)] = &[
            ("Laptop", "High-performance laptop", 99_999, "Electronics", 50),
            ("Wireless Mouse", "Ergonomic wireless mouse", 2_999, "Accessories", 200),
            ("Mechanical Keyboard", "RGB mechanical keyboard", 12_999, "Accessories", 75),
            ("Noise Cancelling Headphones", "Over-ear, 30h battery", 24_999, "Audio", 40),
            ("USB-C Hub", "7-in-1 USB-C adapter", 4_999, "Accessories", 120),
        ];

        let now = Utc::now();
        let mut inventory = Inventory::default();
        for (name, description, cents, category, stock) in SAMPLES {
            inventory.last_id += 1;
            let product = Product {
                id: inventory.last_id,
                name: (*name).to_string(),
                description: (*description).to_string(),
                price: Decimal::new(*cents, 2),
                category: (*category).to_string(),
                stock: *stock,
                created_at: now,
                updated_at: now,
            };
            inventory.products.insert(product.id, product);
        }

        Self {
            inner: RwLock::new(inventory),
        }
    }
}

fn duplicate_name() -> StoreError {
    StoreError::Conflict("A product with this name already exists".to_string())
}

#[async_trait]
impl ProductStore for MemoryStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Memory
    }

    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, StoreError> {
        let inventory = self.inner.read().await;
        let mut products: Vec<Product> = inventory
            .products
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        sort_newest_first(&mut products);
        Ok(products)
    }

    async fn get(&self, id: i64) -> Result<Option<Product>, StoreError> {
        Ok(self.inner.read().await.products.get(&id).cloned())
    }

    async fn create(&self, input: NewProduct) -> Result<Product, StoreError> {
        let mut inventory = self.inner.write().await;
        if inventory.name_taken(input.name(), None) {
            return Err(duplicate_name());
        }

        let id = inventory.last_id + 1;
        let product = input.into_product(id, Utc::now());
        inventory.last_id = id;
        inventory.products.insert(id, product.clone());

        tracing::debug!(id, "Product created");
        Ok(product)
    }

    async fn update(&self, id: i64, patch: ProductPatch) -> Result<Option<Product>, StoreError> {
        patch.ensure_not_empty()?;

        let mut inventory = self.inner.write().await;
        if !inventory.products.contains_key(&id) {
            return Ok(None);
        }
        if let Some(name) = patch.name() {
            if inventory.name_taken(name, Some(id)) {
                return Err(duplicate_name());
            }
        }

        let Some(product) = inventory.products.get_mut(&id) else {
            return Ok(None);
        };
        patch.apply(product, Utc::now());
        Ok(Some(product.clone()))
    }

    async fn delete(&self, id: i64) -> Result<Option<Product>, StoreError> {
        Ok(self.inner.write().await.products.remove(&id))
    }

    async fn stats(&self) -> Result<Vec<CategoryStats>, StoreError> {
        let inventory = self.inner.read().await;
        Ok(CategoryStats::from_products(inventory.products.values()))
    }

    async fn health(&self) -> Option<StorageHealth> {
        None
    }

    async fn close(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::{ProductFields, ValidationError};

    fn new_product(name: &str, cents: i64, category: &str) -> NewProduct {
        NewProduct::new(ProductFields {
            name: Some(name.into()),
            price: Some(Decimal::new(cents, 2)),
            category: Some(category.into()),
            ..Default::default()
        })
        .unwrap()
    }

    fn patch(fields: ProductFields) -> ProductPatch {
        ProductPatch::new(fields).unwrap()
    }

    #[tokio::test]
    async fn ids_increase_and_are_not_reused() {
        let store = MemoryStore::new();
        let a = store.create(new_product("a", 100, "x")).await.unwrap();
        let b = store.create(new_product("b", 100, "x")).await.unwrap();
        assert!(b.id > a.id);

        store.delete(b.id).await.unwrap();
        let c = store.create(new_product("c", 100, "x")).await.unwrap();
        assert!(c.id > b.id);
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let store = MemoryStore::new();
        let created = store
            .create(new_product("Mouse", 1999, "Accessories"))
            .await
            .unwrap();
        let fetched = store.get(created.id).await.unwrap().unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.created_at, fetched.updated_at);
        assert_eq!(fetched.description, "");
        assert_eq!(fetched.stock, 0);
    }

    #[tokio::test]
    async fn duplicate_name_conflicts() {
        let store = MemoryStore::new();
        store.create(new_product("Mouse", 100, "x")).await.unwrap();
        let err = store.create(new_product("Mouse", 200, "y")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn list_is_newest_first_and_filtered() {
        let store = MemoryStore::new();
        let cheap = store.create(new_product("Earbuds", 2000, "Audio")).await.unwrap();
        let pricey = store.create(new_product("Speaker", 8000, "Pro Audio")).await.unwrap();
        store.create(new_product("Cable", 900, "Video")).await.unwrap();

        let all = store.list(&ProductFilter::all()).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[2].id, cheap.id);

        let filter = ProductFilter::all()
            .with_category("AUDIO")
            .with_min_price(Decimal::from(50));
        let hits = store.list(&filter).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, pricey.id);
    }

    #[tokio::test]
    async fn update_changes_only_present_fields() {
        let store = MemoryStore::new();
        let created = store.create(new_product("Mouse", 1999, "Accessories")).await.unwrap();

        let updated = store
            .update(
                created.id,
                patch(ProductFields {
                    stock: Some(7),
                    ..Default::default()
                }),
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.stock, 7);
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.price, created.price);
        assert!(updated.updated_at >= created.created_at);
    }

    #[tokio::test]
    async fn empty_update_fails_without_change() {
        let store = MemoryStore::new();
        let created = store.create(new_product("Mouse", 1999, "Accessories")).await.unwrap();

        let err = store
            .update(created.id, ProductPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(ValidationError::NoFields)));
        assert_eq!(store.get(created.id).await.unwrap().unwrap(), created);
    }

    #[tokio::test]
    async fn missing_ids_report_none() {
        let store = MemoryStore::new();
        let patch = patch(ProductFields {
            stock: Some(1),
            ..Default::default()
        });
        assert!(store.get(999_999).await.unwrap().is_none());
        assert!(store.update(999_999, patch).await.unwrap().is_none());
        assert!(store.delete(999_999).await.unwrap().is_none());
        assert!(store.list(&ProductFilter::all()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rename_to_existing_name_conflicts() {
        let store = MemoryStore::new();
        store.create(new_product("Mouse", 100, "x")).await.unwrap();
        let other = store.create(new_product("Keyboard", 100, "x")).await.unwrap();

        let err = store
            .update(
                other.id,
                patch(ProductFields {
                    name: Some("Mouse".into()),
                    ..Default::default()
                }),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        // renaming to its own name is fine
        let same = store
            .update(
                other.id,
                patch(ProductFields {
                    name: Some("Keyboard".into()),
                    ..Default::default()
                }),
            )
            .await
            .unwrap();
        assert!(same.is_some());
    }

    #[tokio::test]
    async fn delete_returns_snapshot_once() {
        let store = MemoryStore::new();
        let created = store.create(new_product("Mouse", 100, "x")).await.unwrap();

        assert_eq!(store.delete(created.id).await.unwrap(), Some(created.clone()));
        assert_eq!(store.delete(created.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn sample_data_stats() {
        let store = MemoryStore::with_sample_data();
        let stats = store.stats().await.unwrap();

        assert_eq!(stats[0].category, "Accessories");
        assert_eq!(stats[0].count, 3);
        assert_eq!(stats[0].total_stock, 395);

        // next id continues after the samples
        let created = store.create(new_product("Webcam", 5000, "Video")).await.unwrap();
        assert_eq!(created.id, 6);
    }
}
