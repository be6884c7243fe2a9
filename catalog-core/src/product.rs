//! Product record and validated create/update inputs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Maximum length for product names (matches `VARCHAR(255)`)
pub const MAX_NAME_LEN: usize = 255;

/// Maximum length for categories (matches `VARCHAR(100)`)
pub const MAX_CATEGORY_LEN: usize = 100;

/// Prices are stored as `NUMERIC(10, 2)`
const PRICE_SCALE: u32 = 2;

/// Exclusive upper bound for `NUMERIC(10, 2)`
const PRICE_LIMIT: i64 = 100_000_000;

/// Product record as stored and served
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub category: String,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw product fields as they arrive in a request body.
///
/// Every field is optional so the same shape serves create (where some
/// are required) and partial update (where none are). A JSON `null` is
/// indistinguishable from an absent field. Prices are accepted as JSON
/// numbers or numeric strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFields {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<String>,
    pub stock: Option<i64>,
}

/// Validated input for creating a product
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    name: String,
    description: String,
    price: Decimal,
    category: String,
    stock: i32,
}

impl NewProduct {
    /// Validate raw fields for creation.
    ///
    /// # Rules
    /// - name, price and category are required; blank strings count as missing
    /// - price > 0 (after rounding to cents)
    /// - stock >= 0, defaults to 0
    /// - description defaults to ""
    ///
    /// # Example
    /// ```
    /// use catalog_core::{NewProduct, ProductFields, Decimal};
    ///
    /// let fields = ProductFields {
    ///     name: Some("Mouse".into()),
    ///     price: Some(Decimal::new(1999, 2)),
    ///     category: Some("Accessories".into()),
    ///     ..Default::default()
    /// };
    /// let product = NewProduct::new(fields).unwrap();
    /// assert_eq!(product.stock(), 0);
    /// assert_eq!(product.description(), "");
    /// ```
    pub fn new(fields: ProductFields) -> Result<Self, ValidationError> {
        let name = fields.name.as_deref().map(str::trim).unwrap_or_default();
        let category = fields.category.as_deref().map(str::trim).unwrap_or_default();

        let price = match fields.price {
            Some(price) if !name.is_empty() && !category.is_empty() => price,
            _ => return Err(ValidationError::MissingRequired),
        };

        Ok(Self {
            name: check_len("Name", name, MAX_NAME_LEN)?,
            description: fields.description.unwrap_or_default(),
            price: check_price(price)?,
            category: check_len("Category", category, MAX_CATEGORY_LEN)?,
            stock: fields.stock.map(check_stock).transpose()?.unwrap_or(0),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn stock(&self) -> i32 {
        self.stock
    }

    /// Build the stored record once storage has assigned id and timestamp.
    ///
    /// The update timestamp starts equal to the creation timestamp.
    pub fn into_product(self, id: i64, now: DateTime<Utc>) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            category: self.category,
            stock: self.stock,
            created_at: now,
            updated_at: now,
        }
    }
}

impl TryFrom<ProductFields> for NewProduct {
    type Error = ValidationError;

    fn try_from(fields: ProductFields) -> Result<Self, Self::Error> {
        Self::new(fields)
    }
}

/// Validated sparse update.
///
/// Only present fields change; absent fields are left untouched. An
/// empty patch is representable so that callers can detect it, but
/// storage rejects it with [`ValidationError::NoFields`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductPatch {
    name: Option<String>,
    description: Option<String>,
    price: Option<Decimal>,
    category: Option<String>,
    stock: Option<i32>,
}

impl ProductPatch {
    /// Validate raw fields for a partial update.
    ///
    /// Supplied values follow the same rules as creation; a supplied
    /// price <= 0 or stock < 0 is rejected, never clamped.
    pub fn new(fields: ProductFields) -> Result<Self, ValidationError> {
        Ok(Self {
            name: fields
                .name
                .map(|n| check_present("Name", &n, MAX_NAME_LEN))
                .transpose()?,
            description: fields.description,
            price: fields.price.map(check_price).transpose()?,
            category: fields
                .category
                .map(|c| check_present("Category", &c, MAX_CATEGORY_LEN))
                .transpose()?,
            stock: fields.stock.map(check_stock).transpose()?,
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn price(&self) -> Option<Decimal> {
        self.price
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn stock(&self) -> Option<i32> {
        self.stock
    }

    /// True when no field is present.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.stock.is_none()
    }

    /// Reject an empty patch.
    pub fn ensure_not_empty(&self) -> Result<(), ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::NoFields);
        }
        Ok(())
    }

    /// Apply present fields and refresh the update timestamp.
    pub fn apply(&self, product: &mut Product, now: DateTime<Utc>) {
        if let Some(name) = &self.name {
            product.name.clone_from(name);
        }
        if let Some(description) = &self.description {
            product.description.clone_from(description);
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(category) = &self.category {
            product.category.clone_from(category);
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        product.updated_at = now.max(product.created_at);
    }
}

impl TryFrom<ProductFields> for ProductPatch {
    type Error = ValidationError;

    fn try_from(fields: ProductFields) -> Result<Self, Self::Error> {
        Self::new(fields)
    }
}

/// Sort products into the canonical list order: newest first, ties by id.
pub fn sort_newest_first(products: &mut [Product]) {
    products.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<String, ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(value.to_owned())
}

fn check_present(field: &'static str, value: &str, max: usize) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    check_len(field, trimmed, max)
}

fn check_price(price: Decimal) -> Result<Decimal, ValidationError> {
    let price = price.round_dp(PRICE_SCALE);
    if price <= Decimal::ZERO {
        return Err(ValidationError::NonPositivePrice);
    }
    if price >= Decimal::from(PRICE_LIMIT) {
        return Err(ValidationError::OutOfRange { field: "Price" });
    }
    Ok(price)
}

fn check_stock(stock: i64) -> Result<i32, ValidationError> {
    if stock < 0 {
        return Err(ValidationError::NegativeStock);
    }
    i32::try_from(stock).map_err(|_| ValidationError::OutOfRange { field: "Stock" })
}
