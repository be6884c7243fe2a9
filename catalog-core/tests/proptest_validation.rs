use catalog_core::{Decimal, NewProduct, Product, ProductFields, ProductFilter, ProductPatch, ValidationError};
use chrono::Utc;
use proptest::prelude::*;

// Prices in cents, covering zero and negatives
fn arb_cents() -> impl Strategy<Value = i64> {
    -10_000i64..1_000_000
}

fn arb_category() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Audio".to_string()),
        Just("Pro AUDIO".to_string()),
        Just("Video".to_string()),
        Just("Accessories".to_string()),
        "[a-zA-Z ]{1,12}",
    ]
}

fn product(category: String, cents: i64) -> Product {
    let now = Utc::now();
    Product {
        id: 1,
        name: "p".into(),
        description: String::new(),
        price: Decimal::new(cents, 2),
        category,
        stock: 0,
        created_at: now,
        updated_at: now,
    }
}

proptest! {
    /// Property: a created product always has price > 0 and stock >= 0
    #[test]
    fn prop_created_products_hold_invariants(cents in arb_cents(), stock in -100i64..100) {
        let fields = ProductFields {
            name: Some("Widget".into()),
            price: Some(Decimal::new(cents, 2)),
            category: Some("Tools".into()),
            stock: Some(stock),
            ..Default::default()
        };

        match NewProduct::new(fields) {
            Ok(p) => {
                prop_assert!(p.price() > Decimal::ZERO);
                prop_assert!(p.stock() >= 0);
            }
            Err(ValidationError::NonPositivePrice) => prop_assert!(cents <= 0),
            Err(ValidationError::NegativeStock) => prop_assert!(stock < 0),
            Err(other) => prop_assert!(false, "unexpected error: {other}"),
        }
    }

    /// Property: updates never clamp, they reject
    #[test]
    fn prop_patch_rejects_instead_of_clamping(cents in arb_cents()) {
        let fields = ProductFields {
            price: Some(Decimal::new(cents, 2)),
            ..Default::default()
        };
        let result = ProductPatch::new(fields);
        if cents <= 0 {
            prop_assert_eq!(result.unwrap_err(), ValidationError::NonPositivePrice);
        } else {
            prop_assert_eq!(result.unwrap().price(), Some(Decimal::new(cents, 2)));
        }
    }

    /// Property: filter matches iff every criterion matches
    #[test]
    fn prop_filter_is_conjunctive(category in arb_category(), cents in 1i64..100_000, min_cents in 1i64..100_000) {
        let p = product(category.clone(), cents);
        let min = Decimal::new(min_cents, 2);

        let by_category = ProductFilter::all().with_category("audio");
        let by_price = ProductFilter::all().with_min_price(min);
        let both = ProductFilter::all().with_category("audio").with_min_price(min);

        prop_assert_eq!(both.matches(&p), by_category.matches(&p) && by_price.matches(&p));
        prop_assert_eq!(by_category.matches(&p), category.to_lowercase().contains("audio"));
    }
}
