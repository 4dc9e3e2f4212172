// storefront/src/store/memory.rs

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{ShopError, ShopResult};
use crate::models::{Cart, CartItem, CartLine, NewOrder, NewProduct, Order, OrderLine, OrderStatus, Product, Settlement};
use crate::store::Store;

#[derive(Default)]
struct Tables {
  products: HashMap<Uuid, Product>,
  carts: HashMap<Uuid, Cart>,
  carts_by_user: HashMap<Uuid, Uuid>,
  cart_items: HashMap<Uuid, CartItem>,
  orders: HashMap<Uuid, Order>,
  order_lines: HashMap<Uuid, Vec<OrderLine>>,
}

impl Tables {
  fn lines_for(&self, cart_id: Uuid) -> ShopResult<Vec<CartLine>> {
    let mut lines = self
      .cart_items
      .values()
      .filter(|item| item.cart_id == cart_id)
      .map(|item| -> ShopResult<CartLine> {
        let product = self
          .products
          .get(&item.product_id)
          .cloned()
          .ok_or_else(|| ShopError::not_found("Product", item.product_id))?;
        Ok(CartLine {
          item: item.clone(),
          product,
        })
      })
      .collect::<ShopResult<Vec<_>>>()?;
    lines.sort_by_key(|line| line.item.added_at);
    Ok(lines)
  }
}

/// Process-local store behind one `parking_lot::RwLock`.
///
/// Every trait method takes the lock once, so each cart mutation is atomic
/// with respect to concurrent requests. Used by tests and by the server
/// when no `DATABASE_URL` is configured.
#[derive(Default, Clone)]
pub struct MemoryStore {
  tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn order_count(&self) -> usize {
    self.tables.read().orders.len()
  }

  pub fn get_order(&self, order_id: Uuid) -> Option<Order> {
    self.tables.read().orders.get(&order_id).cloned()
  }
}

#[async_trait]
impl Store for MemoryStore {
  async fn list_products(&self) -> ShopResult<Vec<Product>> {
    let mut products: Vec<Product> = self.tables.read().products.values().cloned().collect();
    products.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(products)
  }

  async fn get_product(&self, product_id: Uuid) -> ShopResult<Option<Product>> {
    Ok(self.tables.read().products.get(&product_id).cloned())
  }

  async fn insert_product(&self, product: NewProduct) -> ShopResult<Product> {
    let product = Product {
      id: Uuid::new_v4(),
      name: product.name,
      description: product.description,
      price: product.price,
      stock: product.stock,
      created_at: Utc::now(),
    };
    self.tables.write().products.insert(product.id, product.clone());
    Ok(product)
  }

  async fn get_or_create_cart(&self, user_id: Uuid) -> ShopResult<Cart> {
    let mut tables = self.tables.write();
    if let Some(cart_id) = tables.carts_by_user.get(&user_id).copied() {
      if let Some(cart) = tables.carts.get(&cart_id) {
        return Ok(cart.clone());
      }
    }
    let cart = Cart {
      id: Uuid::new_v4(),
      user_id,
      created_at: Utc::now(),
    };
    tables.carts_by_user.insert(user_id, cart.id);
    tables.carts.insert(cart.id, cart.clone());
    Ok(cart)
  }

  async fn increment_cart_item(&self, cart_id: Uuid, product_id: Uuid) -> ShopResult<CartItem> {
    let mut tables = self.tables.write();
    if let Some(item) = tables
      .cart_items
      .values_mut()
      .find(|item| item.cart_id == cart_id && item.product_id == product_id)
    {
      item.quantity = item
        .quantity
        .checked_add(1)
        .ok_or_else(|| ShopError::BadRequest(format!("quantity of cart item {} is at its maximum", item.id)))?;
      return Ok(item.clone());
    }
    let item = CartItem {
      id: Uuid::new_v4(),
      cart_id,
      product_id,
      quantity: 1,
      added_at: Utc::now(),
    };
    tables.cart_items.insert(item.id, item.clone());
    Ok(item)
  }

  async fn get_cart_item(&self, item_id: Uuid) -> ShopResult<Option<CartItem>> {
    Ok(self.tables.read().cart_items.get(&item_id).cloned())
  }

  async fn set_cart_item_quantity(&self, item_id: Uuid, quantity: i32) -> ShopResult<Option<CartItem>> {
    let mut tables = self.tables.write();
    Ok(tables.cart_items.get_mut(&item_id).map(|item| {
      item.quantity = quantity;
      item.clone()
    }))
  }

  async fn delete_cart_item(&self, item_id: Uuid) -> ShopResult<bool> {
    Ok(self.tables.write().cart_items.remove(&item_id).is_some())
  }

  async fn cart_lines(&self, cart_id: Uuid) -> ShopResult<Vec<CartLine>> {
    self.tables.read().lines_for(cart_id)
  }

  async fn release_cart_items(&self, cart_id: Uuid, lines: &[OrderLine]) -> ShopResult<u64> {
    let mut tables = self.tables.write();
    let mut touched = 0;
    for line in lines {
      let item_id = tables
        .cart_items
        .values()
        .find(|item| item.cart_id == cart_id && item.product_id == line.product_id)
        .map(|item| item.id);
      let Some(item_id) = item_id else { continue };
      touched += 1;
      let remaining = tables.cart_items.get(&item_id).map_or(0, |item| item.quantity - line.quantity);
      if remaining <= 0 {
        tables.cart_items.remove(&item_id);
      } else if let Some(item) = tables.cart_items.get_mut(&item_id) {
        item.quantity = remaining;
      }
    }
    Ok(touched)
  }

  async fn create_order(&self, order: NewOrder) -> ShopResult<Order> {
    let now = Utc::now();
    let created = Order {
      id: Uuid::new_v4(),
      user_id: order.user_id,
      amount: order.amount,
      status: OrderStatus::Created,
      gateway_order_id: None,
      gateway_payment_id: None,
      gateway_signature: None,
      created_at: now,
      updated_at: now,
    };
    let mut tables = self.tables.write();
    tables.order_lines.insert(created.id, order.lines);
    tables.orders.insert(created.id, created.clone());
    Ok(created)
  }

  async fn attach_gateway_order(&self, order_id: Uuid, gateway_order_id: &str) -> ShopResult<()> {
    let mut tables = self.tables.write();
    let order = tables
      .orders
      .get_mut(&order_id)
      .ok_or_else(|| ShopError::not_found("Order", order_id))?;
    order.gateway_order_id = Some(gateway_order_id.to_string());
    order.updated_at = Utc::now();
    Ok(())
  }

  async fn find_order_by_gateway_id(&self, gateway_order_id: &str) -> ShopResult<Option<Order>> {
    Ok(self
      .tables
      .read()
      .orders
      .values()
      .find(|order| order.gateway_order_id.as_deref() == Some(gateway_order_id))
      .cloned())
  }

  async fn order_lines(&self, order_id: Uuid) -> ShopResult<Vec<OrderLine>> {
    Ok(self.tables.read().order_lines.get(&order_id).cloned().unwrap_or_default())
  }

  async fn settle_order(&self, order_id: Uuid, settlement: Settlement) -> ShopResult<Option<Order>> {
    let mut tables = self.tables.write();
    let order = tables
      .orders
      .get_mut(&order_id)
      .ok_or_else(|| ShopError::not_found("Order", order_id))?;
    if order.status.is_terminal() {
      return Ok(None);
    }
    order.status = settlement.status();
    if let Settlement::Paid { payment_id, signature } = settlement {
      order.gateway_payment_id = Some(payment_id);
      order.gateway_signature = Some(signature);
    }
    order.updated_at = Utc::now();
    Ok(Some(order.clone()))
  }

  async fn latest_order(&self, user_id: Uuid, status: OrderStatus) -> ShopResult<Option<Order>> {
    Ok(self
      .tables
      .read()
      .orders
      .values()
      .filter(|order| order.user_id == user_id && order.status == status)
      .max_by_key(|order| order.updated_at)
      .cloned())
  }
}
