//! Command implementations for the catalog CLI

pub mod check_db;
pub mod serve;

pub use check_db::run_check_db;
pub use serve::run_serve;
