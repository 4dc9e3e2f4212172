// storefront/src/store/mod.rs

//! The storage port. Every cart mutation is a single call here so an
//! adapter can make it atomic (one lock, one statement) instead of the
//! services doing read-modify-write across calls.

pub mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ShopResult;
use crate::models::{Cart, CartItem, CartLine, NewOrder, NewProduct, Order, OrderLine, OrderStatus, Product, Settlement};

#[async_trait]
pub trait Store: Send + Sync {
  // --- Catalog ---
  async fn list_products(&self) -> ShopResult<Vec<Product>>;
  async fn get_product(&self, product_id: Uuid) -> ShopResult<Option<Product>>;
  /// Seeding path only; the storefront has no product write surface.
  async fn insert_product(&self, product: NewProduct) -> ShopResult<Product>;

  // --- Cart ---
  async fn get_or_create_cart(&self, user_id: Uuid) -> ShopResult<Cart>;
  /// Adds one unit of `product_id` to the cart: bumps the existing
  /// (cart, product) item or inserts it with quantity 1. Atomic.
  async fn increment_cart_item(&self, cart_id: Uuid, product_id: Uuid) -> ShopResult<CartItem>;
  async fn get_cart_item(&self, item_id: Uuid) -> ShopResult<Option<CartItem>>;
  async fn set_cart_item_quantity(&self, item_id: Uuid, quantity: i32) -> ShopResult<Option<CartItem>>;
  /// Returns whether a row was deleted.
  async fn delete_cart_item(&self, item_id: Uuid) -> ShopResult<bool>;
  async fn cart_lines(&self, cart_id: Uuid) -> ShopResult<Vec<CartLine>>;
  /// Subtracts each line's quantity from the matching cart item and drops
  /// items that reach zero. Returns the number of items touched.
  async fn release_cart_items(&self, cart_id: Uuid, lines: &[OrderLine]) -> ShopResult<u64>;

  // --- Orders ---
  async fn create_order(&self, order: NewOrder) -> ShopResult<Order>;
  async fn attach_gateway_order(&self, order_id: Uuid, gateway_order_id: &str) -> ShopResult<()>;
  async fn find_order_by_gateway_id(&self, gateway_order_id: &str) -> ShopResult<Option<Order>>;
  async fn order_lines(&self, order_id: Uuid) -> ShopResult<Vec<OrderLine>>;
  /// Moves an order out of `created`. Returns the updated order, or `None`
  /// when it was no longer `created` (another delivery got there first).
  async fn settle_order(&self, order_id: Uuid, settlement: Settlement) -> ShopResult<Option<Order>>;
  async fn latest_order(&self, user_id: Uuid, status: OrderStatus) -> ShopResult<Option<Order>>;
}
