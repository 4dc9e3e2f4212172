// storefront_app/src/db/postgres.rs

use async_trait::async_trait;
use sqlx::PgPool;
use storefront::{
  Cart, CartItem, CartLine, NewOrder, NewProduct, Order, OrderLine, OrderStatus, Product, Settlement, ShopError,
  ShopResult, Store,
};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::db::rows::{CartItemRow, CartLineRow, CartRow, OrderLineRow, OrderRow, ProductRow};

const PRODUCT_COLUMNS: &str = "id, name, description, price, stock, created_at";
const CART_ITEM_COLUMNS: &str = "id, cart_id, product_id, quantity, added_at";
const ORDER_COLUMNS: &str =
  "id, user_id, amount, status, gateway_order_id, gateway_payment_id, gateway_signature, created_at, updated_at";

/// `Store` over PostgreSQL. Each cart mutation is one statement (or one
/// transaction), relying on the constraints in `schema.sql`.
#[derive(Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

fn db_err(e: sqlx::Error) -> ShopError {
  ShopError::storage(e)
}

#[async_trait]
impl Store for PgStore {
  async fn list_products(&self) -> ShopResult<Vec<Product>> {
    let rows: Vec<ProductRow> = sqlx::query_as(&format!("SELECT {} FROM products ORDER BY name ASC", PRODUCT_COLUMNS))
      .fetch_all(&self.pool)
      .await
      .map_err(db_err)?;
    Ok(rows.into_iter().map(Product::from).collect())
  }

  async fn get_product(&self, product_id: Uuid) -> ShopResult<Option<Product>> {
    let row: Option<ProductRow> = sqlx::query_as(&format!("SELECT {} FROM products WHERE id = $1", PRODUCT_COLUMNS))
      .bind(product_id)
      .fetch_optional(&self.pool)
      .await
      .map_err(db_err)?;
    Ok(row.map(Product::from))
  }

  async fn insert_product(&self, product: NewProduct) -> ShopResult<Product> {
    let row: ProductRow = sqlx::query_as(&format!(
      "INSERT INTO products (id, name, description, price, stock) VALUES ($1, $2, $3, $4, $5) RETURNING {}",
      PRODUCT_COLUMNS
    ))
    .bind(Uuid::new_v4())
    .bind(&product.name)
    .bind(&product.description)
    .bind(product.price.amount())
    .bind(product.stock)
    .fetch_one(&self.pool)
    .await
    .map_err(db_err)?;
    Ok(row.into())
  }

  async fn get_or_create_cart(&self, user_id: Uuid) -> ShopResult<Cart> {
    // The no-op update makes RETURNING yield the existing row on conflict.
    let row: CartRow = sqlx::query_as(
      "INSERT INTO carts (id, user_id) VALUES ($1, $2) \
       ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id \
       RETURNING id, user_id, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .fetch_one(&self.pool)
    .await
    .map_err(db_err)?;
    Ok(row.into())
  }

  #[instrument(name = "PgStore::increment_cart_item", skip(self), level = "debug", err(Display))]
  async fn increment_cart_item(&self, cart_id: Uuid, product_id: Uuid) -> ShopResult<CartItem> {
    // A saturated item makes the conflict branch update nothing, so no row
    // comes back.
    let row: Option<CartItemRow> = sqlx::query_as(&format!(
      "INSERT INTO cart_items (id, cart_id, product_id, quantity) VALUES ($1, $2, $3, 1) \
       ON CONFLICT (cart_id, product_id) DO UPDATE SET quantity = cart_items.quantity + 1 \
       WHERE cart_items.quantity < $4 \
       RETURNING {}",
      CART_ITEM_COLUMNS
    ))
    .bind(Uuid::new_v4())
    .bind(cart_id)
    .bind(product_id)
    .bind(i32::MAX)
    .fetch_optional(&self.pool)
    .await
    .map_err(db_err)?;
    row.map(CartItem::from).ok_or_else(|| {
      ShopError::BadRequest(format!(
        "quantity of product {} in cart {} is at its maximum",
        product_id, cart_id
      ))
    })
  }

  async fn get_cart_item(&self, item_id: Uuid) -> ShopResult<Option<CartItem>> {
    let row: Option<CartItemRow> =
      sqlx::query_as(&format!("SELECT {} FROM cart_items WHERE id = $1", CART_ITEM_COLUMNS))
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
    Ok(row.map(CartItem::from))
  }

  async fn set_cart_item_quantity(&self, item_id: Uuid, quantity: i32) -> ShopResult<Option<CartItem>> {
    let row: Option<CartItemRow> = sqlx::query_as(&format!(
      "UPDATE cart_items SET quantity = $2 WHERE id = $1 RETURNING {}",
      CART_ITEM_COLUMNS
    ))
    .bind(item_id)
    .bind(quantity)
    .fetch_optional(&self.pool)
    .await
    .map_err(db_err)?;
    Ok(row.map(CartItem::from))
  }

  async fn delete_cart_item(&self, item_id: Uuid) -> ShopResult<bool> {
    let result = sqlx::query("DELETE FROM cart_items WHERE id = $1")
      .bind(item_id)
      .execute(&self.pool)
      .await
      .map_err(db_err)?;
    Ok(result.rows_affected() > 0)
  }

  async fn cart_lines(&self, cart_id: Uuid) -> ShopResult<Vec<CartLine>> {
    let rows: Vec<CartLineRow> = sqlx::query_as(
      "SELECT ci.id, ci.cart_id, ci.product_id, ci.quantity, ci.added_at, \
              p.name AS p_name, p.description AS p_description, p.price AS p_price, \
              p.stock AS p_stock, p.created_at AS p_created_at \
       FROM cart_items ci JOIN products p ON p.id = ci.product_id \
       WHERE ci.cart_id = $1 \
       ORDER BY ci.added_at ASC",
    )
    .bind(cart_id)
    .fetch_all(&self.pool)
    .await
    .map_err(db_err)?;
    Ok(rows.into_iter().map(CartLine::from).collect())
  }

  #[instrument(name = "PgStore::release_cart_items", skip(self, lines), fields(num_lines = lines.len()), err(Display))]
  async fn release_cart_items(&self, cart_id: Uuid, lines: &[OrderLine]) -> ShopResult<u64> {
    let mut tx = self.pool.begin().await.map_err(db_err)?;
    let mut touched = 0;
    for line in lines {
      let deleted = sqlx::query("DELETE FROM cart_items WHERE cart_id = $1 AND product_id = $2 AND quantity <= $3")
        .bind(cart_id)
        .bind(line.product_id)
        .bind(line.quantity)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?
        .rows_affected();
      let reduced = sqlx::query(
        "UPDATE cart_items SET quantity = quantity - $3 WHERE cart_id = $1 AND product_id = $2 AND quantity > $3",
      )
      .bind(cart_id)
      .bind(line.product_id)
      .bind(line.quantity)
      .execute(&mut *tx)
      .await
      .map_err(db_err)?
      .rows_affected();
      touched += deleted + reduced;
    }
    tx.commit().await.map_err(db_err)?;
    debug!(touched, "Cart items released.");
    Ok(touched)
  }

  #[instrument(name = "PgStore::create_order", skip(self, order), fields(user_id = %order.user_id), err(Display))]
  async fn create_order(&self, order: NewOrder) -> ShopResult<Order> {
    let mut tx = self.pool.begin().await.map_err(db_err)?;
    let row: OrderRow = sqlx::query_as(&format!(
      "INSERT INTO orders (id, user_id, amount, status) VALUES ($1, $2, $3, $4) RETURNING {}",
      ORDER_COLUMNS
    ))
    .bind(Uuid::new_v4())
    .bind(order.user_id)
    .bind(order.amount.amount())
    .bind(OrderStatus::Created.as_str())
    .fetch_one(&mut *tx)
    .await
    .map_err(db_err)?;

    for line in &order.lines {
      sqlx::query(
        "INSERT INTO order_lines (order_id, product_id, product_name, unit_price, quantity) VALUES ($1, $2, $3, $4, $5)",
      )
      .bind(row.id)
      .bind(line.product_id)
      .bind(&line.product_name)
      .bind(line.unit_price.amount())
      .bind(line.quantity)
      .execute(&mut *tx)
      .await
      .map_err(db_err)?;
    }
    tx.commit().await.map_err(db_err)?;
    row.into_order()
  }

  async fn attach_gateway_order(&self, order_id: Uuid, gateway_order_id: &str) -> ShopResult<()> {
    let result = sqlx::query("UPDATE orders SET gateway_order_id = $2, updated_at = NOW() WHERE id = $1")
      .bind(order_id)
      .bind(gateway_order_id)
      .execute(&self.pool)
      .await
      .map_err(db_err)?;
    if result.rows_affected() == 0 {
      return Err(ShopError::not_found("Order", order_id));
    }
    Ok(())
  }

  async fn find_order_by_gateway_id(&self, gateway_order_id: &str) -> ShopResult<Option<Order>> {
    let row: Option<OrderRow> =
      sqlx::query_as(&format!("SELECT {} FROM orders WHERE gateway_order_id = $1", ORDER_COLUMNS))
        .bind(gateway_order_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
    row.map(OrderRow::into_order).transpose()
  }

  async fn order_lines(&self, order_id: Uuid) -> ShopResult<Vec<OrderLine>> {
    let rows: Vec<OrderLineRow> = sqlx::query_as(
      "SELECT product_id, product_name, unit_price, quantity FROM order_lines WHERE order_id = $1 ORDER BY product_name",
    )
    .bind(order_id)
    .fetch_all(&self.pool)
    .await
    .map_err(db_err)?;
    Ok(rows.into_iter().map(OrderLine::from).collect())
  }

  #[instrument(name = "PgStore::settle_order", skip(self, settlement), fields(status = %settlement.status()), err(Display))]
  async fn settle_order(&self, order_id: Uuid, settlement: Settlement) -> ShopResult<Option<Order>> {
    let status = settlement.status();
    let (payment_id, signature) = match settlement {
      Settlement::Paid { payment_id, signature } => (Some(payment_id), Some(signature)),
      Settlement::Failed => (None, None),
    };
    let row: Option<OrderRow> = sqlx::query_as(&format!(
      "UPDATE orders SET status = $2, gateway_payment_id = $3, gateway_signature = $4, updated_at = NOW() \
       WHERE id = $1 AND status = 'created' RETURNING {}",
      ORDER_COLUMNS
    ))
    .bind(order_id)
    .bind(status.as_str())
    .bind(payment_id)
    .bind(signature)
    .fetch_optional(&self.pool)
    .await
    .map_err(db_err)?;
    row.map(OrderRow::into_order).transpose()
  }

  async fn latest_order(&self, user_id: Uuid, status: OrderStatus) -> ShopResult<Option<Order>> {
    let row: Option<OrderRow> = sqlx::query_as(&format!(
      "SELECT {} FROM orders WHERE user_id = $1 AND status = $2 ORDER BY updated_at DESC LIMIT 1",
      ORDER_COLUMNS
    ))
    .bind(user_id)
    .bind(status.as_str())
    .fetch_optional(&self.pool)
    .await
    .map_err(db_err)?;
    row.map(OrderRow::into_order).transpose()
  }
}
