// storefront_app/src/db/rows.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use storefront::{Cart, CartItem, CartLine, Money, Order, OrderLine, Product, ShopResult};
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct ProductRow {
  pub id: Uuid,
  pub name: String,
  pub description: String,
  pub price: Decimal,
  pub stock: i32,
  pub created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
  fn from(row: ProductRow) -> Self {
    Product {
      id: row.id,
      name: row.name,
      description: row.description,
      price: Money::new(row.price),
      stock: row.stock,
      created_at: row.created_at,
    }
  }
}

#[derive(Debug, Clone, FromRow)]
pub struct CartRow {
  pub id: Uuid,
  pub user_id: Uuid,
  pub created_at: DateTime<Utc>,
}

impl From<CartRow> for Cart {
  fn from(row: CartRow) -> Self {
    Cart {
      id: row.id,
      user_id: row.user_id,
      created_at: row.created_at,
    }
  }
}

#[derive(Debug, Clone, FromRow)]
pub struct CartItemRow {
  pub id: Uuid,
  pub cart_id: Uuid,
  pub product_id: Uuid,
  pub quantity: i32,
  pub added_at: DateTime<Utc>,
}

impl From<CartItemRow> for CartItem {
  fn from(row: CartItemRow) -> Self {
    CartItem {
      id: row.id,
      cart_id: row.cart_id,
      product_id: row.product_id,
      quantity: row.quantity,
      added_at: row.added_at,
    }
  }
}

/// `cart_items` joined with `products`; product columns are prefixed `p_`.
#[derive(Debug, Clone, FromRow)]
pub struct CartLineRow {
  pub id: Uuid,
  pub cart_id: Uuid,
  pub product_id: Uuid,
  pub quantity: i32,
  pub added_at: DateTime<Utc>,
  pub p_name: String,
  pub p_description: String,
  pub p_price: Decimal,
  pub p_stock: i32,
  pub p_created_at: DateTime<Utc>,
}

impl From<CartLineRow> for CartLine {
  fn from(row: CartLineRow) -> Self {
    CartLine {
      product: Product {
        id: row.product_id,
        name: row.p_name,
        description: row.p_description,
        price: Money::new(row.p_price),
        stock: row.p_stock,
        created_at: row.p_created_at,
      },
      item: CartItem {
        id: row.id,
        cart_id: row.cart_id,
        product_id: row.product_id,
        quantity: row.quantity,
        added_at: row.added_at,
      },
    }
  }
}

#[derive(Debug, Clone, FromRow)]
pub struct OrderRow {
  pub id: Uuid,
  pub user_id: Uuid,
  pub amount: Decimal,
  pub status: String,
  pub gateway_order_id: Option<String>,
  pub gateway_payment_id: Option<String>,
  pub gateway_signature: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl OrderRow {
  /// Fails on a status string the schema's CHECK should have rejected.
  pub fn into_order(self) -> ShopResult<Order> {
    Ok(Order {
      status: self.status.parse()?,
      id: self.id,
      user_id: self.user_id,
      amount: Money::new(self.amount),
      gateway_order_id: self.gateway_order_id,
      gateway_payment_id: self.gateway_payment_id,
      gateway_signature: self.gateway_signature,
      created_at: self.created_at,
      updated_at: self.updated_at,
    })
  }
}

#[derive(Debug, Clone, FromRow)]
pub struct OrderLineRow {
  pub product_id: Uuid,
  pub product_name: String,
  pub unit_price: Decimal,
  pub quantity: i32,
}

impl From<OrderLineRow> for OrderLine {
  fn from(row: OrderLineRow) -> Self {
    OrderLine {
      product_id: row.product_id,
      product_name: row.product_name,
      unit_price: Money::new(row.unit_price),
      quantity: row.quantity,
    }
  }
}
