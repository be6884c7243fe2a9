//! List filter criteria
//!
//! Criteria are combined with AND; an absent criterion imposes no
//! constraint.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{Product, ValidationError};

/// Query parameters for listing products
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub category: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
}

/// Validated list filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    category: Option<String>,
    min_price: Option<Decimal>,
    max_price: Option<Decimal>,
}

impl ProductFilter {
    /// Filter that matches every product.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to categories containing `needle` (case-insensitive).
    ///
    /// A blank needle is ignored.
    pub fn with_category(mut self, needle: &str) -> Self {
        let needle = needle.trim();
        self.category = (!needle.is_empty()).then(|| needle.to_owned());
        self
    }

    /// Restrict to prices >= `min`.
    pub fn with_min_price(mut self, min: Decimal) -> Self {
        self.min_price = Some(min);
        self
    }

    /// Restrict to prices <= `max`.
    pub fn with_max_price(mut self, max: Decimal) -> Self {
        self.max_price = Some(max);
        self
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn min_price(&self) -> Option<Decimal> {
        self.min_price
    }

    pub fn max_price(&self) -> Option<Decimal> {
        self.max_price
    }

    /// True when no criterion is set.
    pub fn is_unfiltered(&self) -> bool {
        self.category.is_none() && self.min_price.is_none() && self.max_price.is_none()
    }

    /// Evaluate every criterion against one product.
    pub fn matches(&self, product: &Product) -> bool {
        let category_ok = self.category.as_deref().map_or(true, |needle| {
            product
                .category
                .to_lowercase()
                .contains(&needle.to_lowercase())
        });
        let min_ok = self.min_price.map_or(true, |min| product.price >= min);
        let max_ok = self.max_price.map_or(true, |max| product.price <= max);

        category_ok && min_ok && max_ok
    }
}

impl TryFrom<ListQuery> for ProductFilter {
    type Error = ValidationError;

    fn try_from(query: ListQuery) -> Result<Self, Self::Error> {
        let mut filter = Self::all();
        if let Some(category) = query.category.as_deref() {
            filter = filter.with_category(category);
        }
        if let Some(min) = parse_price("minPrice", query.min_price.as_deref())? {
            filter = filter.with_min_price(min);
        }
        if let Some(max) = parse_price("maxPrice", query.max_price.as_deref())? {
            filter = filter.with_max_price(max);
        }
        Ok(filter)
    }
}

fn parse_price(field: &'static str, raw: Option<&str>) -> Result<Option<Decimal>, ValidationError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => Decimal::from_str(value)
            .or_else(|_| Decimal::from_scientific(value))
            .map(Some)
            .map_err(|_| ValidationError::InvalidNumber { field }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(category: &str, price: Decimal) -> Product {
        let now = Utc::now();
        Product {
            id: 1,
            name: "x".into(),
            description: String::new(),
            price,
            category: category.into(),
            stock: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn unfiltered_matches_everything() {
        let filter = ProductFilter::all();
        assert!(filter.is_unfiltered());
        assert!(filter.matches(&product("Audio", Decimal::ONE)));
    }

    #[test]
    fn category_is_case_insensitive_substring() {
        let filter = ProductFilter::all().with_category("audio");
        assert!(filter.matches(&product("Pro Audio", Decimal::ONE)));
        assert!(filter.matches(&product("AUDIO", Decimal::ONE)));
        assert!(!filter.matches(&product("Video", Decimal::ONE)));
    }

    #[test]
    fn price_bounds_are_inclusive() {
        let filter = ProductFilter::all()
            .with_min_price(Decimal::from(50))
            .with_max_price(Decimal::from(100));
        assert!(filter.matches(&product("a", Decimal::from(50))));
        assert!(filter.matches(&product("a", Decimal::from(100))));
        assert!(!filter.matches(&product("a", Decimal::new(4999, 2))));
        assert!(!filter.matches(&product("a", Decimal::new(10001, 2))));
    }

    #[test]
    fn criteria_are_conjunctive() {
        let filter = ProductFilter::all()
            .with_category("audio")
            .with_min_price(Decimal::from(50));
        assert!(filter.matches(&product("Audio", Decimal::from(60))));
        assert!(!filter.matches(&product("Audio", Decimal::from(40))));
        assert!(!filter.matches(&product("Video", Decimal::from(60))));
    }

    #[test]
    fn parses_query_parameters() {
        let query = ListQuery {
            category: Some("  ".into()),
            min_price: Some("10.5".into()),
            max_price: Some("".into()),
        };
        let filter = ProductFilter::try_from(query).unwrap();
        assert_eq!(filter.category(), None);
        assert_eq!(filter.min_price(), Some(Decimal::new(105, 1)));
        assert_eq!(filter.max_price(), None);
    }

    #[test]
    fn rejects_non_numeric_price() {
        let query = ListQuery {
            max_price: Some("cheap".into()),
            ..Default::default()
        };
        let err = ProductFilter::try_from(query).unwrap_err();
        assert_eq!(err, ValidationError::InvalidNumber { field: "maxPrice" });
    }
}
