// storefront/src/services/orders.rs

use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::ShopResult;
use crate::models::{Order, OrderStatus};
use crate::store::Store;

/// Order lookups for the post-payment pages.
#[derive(Clone)]
pub struct Orders {
  store: Arc<dyn Store>,
}

impl Orders {
  pub fn new(store: Arc<dyn Store>) -> Self {
    Self { store }
  }

  #[instrument(name = "orders::latest_paid_order", skip(self), err(Display))]
  pub async fn latest_paid_order(&self, user_id: Uuid) -> ShopResult<Option<Order>> {
    self.store.latest_order(user_id, OrderStatus::Paid).await
  }
}
