// storefront/src/models/mod.rs

//! Storefront entities. Storage adapters map their rows onto these types.

pub mod cart;
pub mod order;
pub mod product;

pub use cart::{Cart, CartItem, CartLine, CartView};
pub use order::{NewOrder, Order, OrderLine, OrderStatus, Settlement};
pub use product::{NewProduct, Product};
