//! Per-category aggregate rows

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::Product;

/// Aggregate over all products sharing one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub category: String,
    pub count: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub average_price: Decimal,
    pub total_stock: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub min_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub max_price: Decimal,
}

impl CategoryStats {
    /// Aggregate a product set, one row per distinct category.
    ///
    /// Rows are ordered by descending count, then by category name.
    pub fn from_products<'a>(products: impl IntoIterator<Item = &'a Product>) -> Vec<Self> {
        let mut groups: BTreeMap<&str, Accumulator> = BTreeMap::new();
        for product in products {
            groups
                .entry(product.category.as_str())
                .or_insert_with(|| Accumulator::new(product.price))
                .add(product);
        }

        let mut rows: Vec<Self> = groups
            .into_iter()
            .map(|(category, acc)| acc.finish(category))
            .collect();
        sort_by_count(&mut rows);
        rows
    }
}

/// Canonical stats order: most populous category first.
fn sort_by_count(rows: &mut [CategoryStats]) {
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)));
}

struct Accumulator {
    count: i64,
    price_sum: Decimal,
    total_stock: i64,
    min_price: Decimal,
    max_price: Decimal,
}

impl Accumulator {
    fn new(seed: Decimal) -> Self {
        Self {
            count: 0,
            price_sum: Decimal::ZERO,
            total_stock: 0,
            min_price: seed,
            max_price: seed,
        }
    }

    fn add(&mut self, product: &Product) {
        self.count += 1;
        self.price_sum += product.price;
        self.total_stock += i64::from(product.stock);
        self.min_price = self.min_price.min(product.price);
        self.max_price = self.max_price.max(product.price);
    }

    fn finish(self, category: &str) -> CategoryStats {
        CategoryStats {
            category: category.to_owned(),
            count: self.count,
            average_price: (self.price_sum / Decimal::from(self.count)).round_dp(2),
            total_stock: self.total_stock,
            min_price: self.min_price,
            max_price: self.max_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(id: i64, category: &str, price: Decimal, stock: i32) -> Product {
        let now = Utc::now();
        Product {
            id,
            name: format!("p{id}"),
            description: String::new(),
            price,
            category: category.into(),
            stock,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn empty_set_has_no_rows() {
        let products: Vec<Product> = Vec::new();
        assert!(CategoryStats::from_products(&products).is_empty());
    }

    #[test]
    fn aggregates_per_category() {
        let products = vec![
            product(1, "Audio", Decimal::new(1000, 2), 5),
            product(2, "Audio", Decimal::new(2000, 2), 3),
            product(3, "Video", Decimal::new(9999, 2), 1),
            product(4, "Audio", Decimal::new(3001, 2), 0),
        ];

        let rows = CategoryStats::from_products(&products);
        assert_eq!(rows.len(), 2);

        let audio = &rows[0];
        assert_eq!(audio.category, "Audio");
        assert_eq!(audio.count, 3);
        assert_eq!(audio.total_stock, 8);
        assert_eq!(audio.min_price, Decimal::new(1000, 2));
        assert_eq!(audio.max_price, Decimal::new(3001, 2));
        assert_eq!(audio.average_price, Decimal::new(2000, 2));

        assert_eq!(rows[1].category, "Video");
        assert_eq!(rows[1].count, 1);
    }

    #[test]
    fn ties_ordered_by_category_name() {
        let products = vec![
            product(1, "Zeta", Decimal::ONE, 1),
            product(2, "Alpha", Decimal::ONE, 1),
        ];
        let rows = CategoryStats::from_products(&products);
        assert_eq!(rows[0].category, "Alpha");
        assert_eq!(rows[1].category, "Zeta");
    }

    #[test]
    fn prices_serialize_as_numbers() {
        let products = vec![
            product(1, "Audio", Decimal::new(2999, 2), 1),
            product(2, "Audio", Decimal::new(4999, 2), 1),
        ];
        let json = serde_json::to_value(&CategoryStats::from_products(&products)[0]).unwrap();

        assert_eq!(json["averagePrice"], serde_json::json!(39.99));
        assert_eq!(json["minPrice"], serde_json::json!(29.99));
        assert_eq!(json["maxPrice"], serde_json::json!(49.99));
    }
}
