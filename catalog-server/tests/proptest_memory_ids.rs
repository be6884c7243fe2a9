//! Property tests for id assignment in the in-memory store

use catalog_core::{Decimal, NewProduct, ProductFields};
use catalog_server::{MemoryStore, ProductStore};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Create,
    /// Delete the n-th live product (modulo the live count)
    Delete(usize),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Create),
        1 => any::<usize>().prop_map(Op::Delete),
    ]
}

fn input(n: usize) -> NewProduct {
    NewProduct::new(ProductFields {
        name: Some(format!("product-{n}")),
        price: Some(Decimal::ONE),
        category: Some("x".into()),
        ..Default::default()
    })
    .unwrap()
}

proptest! {
    /// Property: every id is larger than any id handed out before it,
    /// whatever deletes happened in between
    #[test]
    fn prop_ids_strictly_increase(ops in prop::collection::vec(arb_op(), 1..40)) {
        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        rt.block_on(async {
            let store = MemoryStore::new();
            let mut live: Vec<i64> = Vec::new();
            let mut highest = 0;

            for (n, op) in ops.into_iter().enumerate() {
                match op {
                    Op::Create => {
                        let product = store.create(input(n)).await.unwrap();
                        prop_assert!(product.id > highest);
                        highest = product.id;
                        live.push(product.id);
                    }
                    Op::Delete(i) if !live.is_empty() => {
                        let id = live.remove(i % live.len());
                        prop_assert!(store.delete(id).await.unwrap().is_some());
                    }
                    Op::Delete(_) => {}
                }
            }
            Ok(())
        })?;
    }
}
