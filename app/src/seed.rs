// storefront_app/src/seed.rs

use rust_decimal::Decimal;
use storefront::{Money, NewProduct, ShopResult, Store};
use tracing::info;

fn demo_catalog() -> Vec<NewProduct> {
  [
    ("Cotton T-Shirt", "Plain crew-neck tee.", Decimal::new(49900, 2), 50),
    ("Ceramic Mug", "350 ml, dishwasher safe.", Decimal::new(29950, 2), 120),
    ("Notebook", "A5, 192 dotted pages.", Decimal::new(19900, 2), 200),
    ("Canvas Tote", "Heavy canvas shopping bag.", Decimal::new(34900, 2), 75),
  ]
  .into_iter()
  .map(|(name, description, price, stock)| NewProduct {
    name: name.to_string(),
    description: description.to_string(),
    price: Money::new(price),
    stock,
  })
  .collect()
}

/// Inserts the demo catalog unless the store already has products.
pub async fn seed_catalog(store: &dyn Store) -> ShopResult<usize> {
  if !store.list_products().await?.is_empty() {
    info!("Catalog already populated; skipping seed.");
    return Ok(0);
  }
  let products = demo_catalog();
  let count = products.len();
  for product in products {
    store.insert_product(product).await?;
  }
  info!(count, "Demo catalog seeded.");
  Ok(count)
}
