// storefront_app/src/db/mod.rs

//! PostgreSQL adapter for the storefront's storage port.

pub mod postgres;
pub mod rows;

pub use postgres::PgStore;
