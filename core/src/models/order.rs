// storefront/src/models/order.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::ShopError;
use crate::money::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  Created,
  Paid,
  Failed,
}

impl OrderStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      OrderStatus::Created => "created",
      OrderStatus::Paid => "paid",
      OrderStatus::Failed => "failed",
    }
  }

  /// `paid` and `failed` are final; an order leaves `created` once.
  pub fn is_terminal(&self) -> bool {
    !matches!(self, OrderStatus::Created)
  }
}

impl fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for OrderStatus {
  type Err = ShopError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "created" => Ok(OrderStatus::Created),
      "paid" => Ok(OrderStatus::Paid),
      "failed" => Ok(OrderStatus::Failed),
      other => Err(ShopError::storage(anyhow::anyhow!("unknown order status '{}'", other))),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
  pub id: Uuid,
  pub user_id: Uuid,
  pub amount: Money,
  pub status: OrderStatus,
  pub gateway_order_id: Option<String>,
  pub gateway_payment_id: Option<String>,
  pub gateway_signature: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// What was in the cart when checkout started. Payment success releases
/// exactly these quantities from the cart, nothing added afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderLine {
  pub product_id: Uuid,
  pub product_name: String,
  pub unit_price: Money,
  pub quantity: i32,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
  pub user_id: Uuid,
  pub amount: Money,
  pub lines: Vec<OrderLine>,
}

/// Terminal transition applied to a `created` order.
#[derive(Debug, Clone, PartialEq)]
pub enum Settlement {
  Paid { payment_id: String, signature: String },
  Failed,
}

impl Settlement {
  pub fn status(&self) -> OrderStatus {
    match self {
      Settlement::Paid { .. } => OrderStatus::Paid,
      Settlement::Failed => OrderStatus::Failed,
    }
  }
}
