// storefront/src/services/cart.rs

//! Per-user cart operations.

use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::error::{ShopError, ShopResult};
use crate::models::{Cart, CartItem, CartLine, CartView};
use crate::money::Money;
use crate::store::Store;

/// Sum of `price × quantity` over the lines, in decimal arithmetic.
pub fn compute_total(lines: &[CartLine]) -> Money {
  lines.iter().map(CartLine::line_total).sum()
}

/// Reads a submitted quantity field. Missing or unparsable input falls back
/// to 1 instead of failing the request.
pub fn parse_quantity(raw: Option<&str>) -> i64 {
  raw.and_then(|value| value.trim().parse::<i64>().ok()).unwrap_or(1)
}

#[derive(Clone)]
pub struct CartManager {
  store: Arc<dyn Store>,
}

impl CartManager {
  pub fn new(store: Arc<dyn Store>) -> Self {
    Self { store }
  }

  /// Returns the user's cart, creating an empty one on first access.
  #[instrument(name = "cart::get_or_create_cart", skip(self), err(Display))]
  pub async fn get_or_create_cart(&self, user_id: Uuid) -> ShopResult<Cart> {
    self.store.get_or_create_cart(user_id).await
  }

  #[instrument(name = "cart::view_cart", skip(self), err(Display))]
  pub async fn view_cart(&self, user_id: Uuid) -> ShopResult<CartView> {
    let cart = self.store.get_or_create_cart(user_id).await?;
    let lines = self.store.cart_lines(cart.id).await?;
    let total = compute_total(&lines);
    debug!(cart_id = %cart.id, lines = lines.len(), %total, "Cart loaded.");
    Ok(CartView { cart, lines, total })
  }

  /// Adds one unit of the product, merging into an existing line.
  #[instrument(name = "cart::add_item", skip(self), err(Display))]
  pub async fn add_item(&self, user_id: Uuid, product_id: Uuid) -> ShopResult<CartItem> {
    if self.store.get_product(product_id).await?.is_none() {
      warn!("Attempt to add a missing product to the cart.");
      return Err(ShopError::not_found("Product", product_id));
    }
    let cart = self.store.get_or_create_cart(user_id).await?;
    let item = self.store.increment_cart_item(cart.id, product_id).await?;
    info!(cart_id = %cart.id, item_id = %item.id, quantity = item.quantity, "Cart item added.");
    Ok(item)
  }

  /// Overwrites the quantity of one of the user's items. `quantity <= 0`
  /// deletes the item and returns `None`. Stock is not consulted.
  #[instrument(name = "cart::set_item_quantity", skip(self), err(Display))]
  pub async fn set_item_quantity(&self, user_id: Uuid, item_id: Uuid, quantity: i64) -> ShopResult<Option<CartItem>> {
    self.owned_item(user_id, item_id).await?;

    if quantity <= 0 {
      self.store.delete_cart_item(item_id).await?;
      info!("Cart item removed by non-positive quantity.");
      return Ok(None);
    }

    let quantity = i32::try_from(quantity)
      .map_err(|_| ShopError::BadRequest(format!("quantity {} is too large", quantity)))?;
    let updated = self
      .store
      .set_cart_item_quantity(item_id, quantity)
      .await?
      .ok_or_else(|| ShopError::not_found("CartItem", item_id))?;
    info!(quantity, "Cart item quantity updated.");
    Ok(Some(updated))
  }

  #[instrument(name = "cart::remove_item", skip(self), err(Display))]
  pub async fn remove_item(&self, user_id: Uuid, item_id: Uuid) -> ShopResult<()> {
    self.owned_item(user_id, item_id).await?;
    self.store.delete_cart_item(item_id).await?;
    info!("Cart item removed.");
    Ok(())
  }

  /// Loads `item_id` and checks it sits in `user_id`'s cart.
  async fn owned_item(&self, user_id: Uuid, item_id: Uuid) -> ShopResult<CartItem> {
    let item = self
      .store
      .get_cart_item(item_id)
      .await?
      .ok_or_else(|| ShopError::not_found("CartItem", item_id))?;
    let cart = self.store.get_or_create_cart(user_id).await?;
    if item.cart_id != cart.id {
      warn!(%user_id, %item_id, "Cart item belongs to another user's cart.");
      return Err(ShopError::Forbidden { item_id });
    }
    Ok(item)
  }
}
