// storefront/src/models/product.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::Money;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
  pub id: Uuid,
  pub name: String,
  pub description: String,
  pub price: Money,
  pub stock: i32,
  pub created_at: DateTime<Utc>,
}

/// Catalog seeding input. The storefront itself never writes products.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
  pub name: String,
  pub description: String,
  pub price: Money,
  pub stock: i32,
}
