// storefront/src/models/cart.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::product::Product;
use crate::money::Money;

/// One cart per user, created on first access.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cart {
  pub id: Uuid,
  pub user_id: Uuid,
  pub created_at: DateTime<Utc>,
}

/// A product in a cart. `quantity` is always at least 1; an item whose
/// quantity would drop to zero is deleted instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartItem {
  pub id: Uuid,
  pub cart_id: Uuid,
  pub product_id: Uuid,
  pub quantity: i32,
  pub added_at: DateTime<Utc>,
}

/// A cart item joined with the product it refers to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLine {
  pub item: CartItem,
  pub product: Product,
}

impl CartLine {
  pub fn line_total(&self) -> Money {
    self.product.price.times(self.item.quantity)
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct CartView {
  pub cart: Cart,
  pub lines: Vec<CartLine>,
  pub total: Money,
}
