//! catalog-core: product catalog domain model
//!
//! Records, validated inputs and filters shared by every storage
//! backend. All user input is validated when the input types are
//! constructed; storage code never sees an unchecked value.

pub mod filter;
pub mod product;
pub mod stats;
pub mod validation;

pub use filter::{ListQuery, ProductFilter};
pub use product::{sort_newest_first, NewProduct, Product, ProductFields, ProductPatch};
pub use stats::CategoryStats;
pub use validation::ValidationError;

pub use rust_decimal::Decimal;
