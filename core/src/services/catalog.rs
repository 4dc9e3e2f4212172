// storefront/src/services/catalog.rs

use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::error::{ShopError, ShopResult};
use crate::models::Product;
use crate::store::Store;

/// Read-only product listing and detail.
#[derive(Clone)]
pub struct Catalog {
  store: Arc<dyn Store>,
}

impl Catalog {
  pub fn new(store: Arc<dyn Store>) -> Self {
    Self { store }
  }

  /// All products, unfiltered and unpaginated.
  #[instrument(name = "catalog::list_products", skip(self), err(Display))]
  pub async fn list_products(&self) -> ShopResult<Vec<Product>> {
    let products = self.store.list_products().await?;
    info!(count = products.len(), "Fetched products.");
    Ok(products)
  }

  #[instrument(name = "catalog::get_product", skip(self), err(Display))]
  pub async fn get_product(&self, product_id: Uuid) -> ShopResult<Product> {
    match self.store.get_product(product_id).await? {
      Some(product) => Ok(product),
      None => {
        warn!("Product not found.");
        Err(ShopError::not_found("Product", product_id))
      }
    }
  }
}
