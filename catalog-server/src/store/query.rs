//! Dynamic SQL for filtered listing and partial updates
//!
//! Only the *presence* of a criterion or patch field decides which
//! fragments are pushed. Every value goes through `push_bind`, so no
//! client-supplied content ever reaches the command text.

use catalog_core::{ProductFilter, ProductPatch};
use sqlx::{Postgres, QueryBuilder};

/// Columns returned for every product query, in `Product` field order.
pub const PRODUCT_COLUMNS: &str =
    "id, name, description, price, category, stock, created_at, updated_at";

/// `SELECT` with one `AND` clause per present criterion, newest first.
pub fn select_products(filter: &ProductFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE TRUE"));

    if let Some(category) = filter.category() {
        builder
            .push(" AND category ILIKE ")
            .push_bind(contains_pattern(category));
    }
    if let Some(min) = filter.min_price() {
        builder.push(" AND price >= ").push_bind(min);
    }
    if let Some(max) = filter.max_price() {
        builder.push(" AND price <= ").push_bind(max);
    }

    builder.push(" ORDER BY created_at DESC, id DESC");
    builder
}

/// `UPDATE` setting only the present fields, always refreshing
/// `updated_at`.
///
/// Callers must reject an empty patch first; with no fields this would
/// only touch the timestamp.
pub fn update_product(id: i64, patch: &ProductPatch) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("UPDATE products SET ");

    {
        let mut set = builder.separated(", ");
        if let Some(name) = patch.name() {
            set.push("name = ").push_bind_unseparated(name.to_owned());
        }
        if let Some(description) = patch.description() {
            set.push("description = ")
                .push_bind_unseparated(description.to_owned());
        }
        if let Some(price) = patch.price() {
            set.push("price = ").push_bind_unseparated(price);
        }
        if let Some(category) = patch.category() {
            set.push("category = ").push_bind_unseparated(category.to_owned());
        }
        if let Some(stock) = patch.stock() {
            set.push("stock = ").push_bind_unseparated(stock);
        }
        set.push("updated_at = NOW()");
    }

    builder.push(" WHERE id = ").push_bind(id);
    builder.push(format!(" RETURNING {PRODUCT_COLUMNS}"));
    builder
}

/// `ILIKE` pattern matching `needle` anywhere, with wildcards escaped.
pub fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::{Decimal, ProductFields};

    fn patch(fields: ProductFields) -> ProductPatch {
        ProductPatch::new(fields).unwrap()
    }

    #[test]
    fn unfiltered_select_has_no_predicates() {
        let builder = select_products(&ProductFilter::all());
        assert_eq!(
            builder.sql(),
            "SELECT id, name, description, price, category, stock, created_at, updated_at \
             FROM products WHERE TRUE ORDER BY created_at DESC, id DESC"
        );
    }

    #[test]
    fn filters_become_numbered_binds() {
        let filter = ProductFilter::all()
            .with_category("audio")
            .with_min_price(Decimal::from(50))
            .with_max_price(Decimal::from(500));
        let builder = select_products(&filter);
        let sql = builder.sql();

        assert!(sql.contains(" AND category ILIKE $1"));
        assert!(sql.contains(" AND price >= $2"));
        assert!(sql.contains(" AND price <= $3"));
        assert!(!sql.contains("audio"));
    }

    #[test]
    fn only_present_criteria_are_pushed() {
        let filter = ProductFilter::all().with_max_price(Decimal::from(10));
        let builder = select_products(&filter);
        let sql = builder.sql();

        assert!(!sql.contains("ILIKE"));
        assert!(sql.contains(" AND price <= $1"));
    }

    #[test]
    fn hostile_values_stay_out_of_sql() {
        let filter = ProductFilter::all().with_category("'; DROP TABLE products; --");
        let builder = select_products(&filter);
        assert!(!builder.sql().contains("DROP"));

        let builder = update_product(
            1,
            &patch(ProductFields {
                name: Some("x'); DELETE FROM products; --".into()),
                ..Default::default()
            }),
        );
        assert!(!builder.sql().contains("DELETE"));
    }

    #[test]
    fn update_sets_only_present_fields() {
        let builder = update_product(
            42,
            &patch(ProductFields {
                price: Some(Decimal::new(1999, 2)),
                stock: Some(3),
                ..Default::default()
            }),
        );

        assert_eq!(
            builder.sql(),
            "UPDATE products SET price = $1, stock = $2, updated_at = NOW() WHERE id = $3 \
             RETURNING id, name, description, price, category, stock, created_at, updated_at"
        );
    }

    #[test]
    fn update_with_every_field() {
        let builder = update_product(
            1,
            &patch(ProductFields {
                name: Some("n".into()),
                description: Some("d".into()),
                price: Some(Decimal::ONE),
                category: Some("c".into()),
                stock: Some(0),
            }),
        );
        let sql = builder.sql();

        assert!(sql.starts_with(
            "UPDATE products SET name = $1, description = $2, price = $3, category = $4, \
             stock = $5, updated_at = NOW() WHERE id = $6"
        ));
    }

    #[test]
    fn pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("audio"), "%audio%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }
}
