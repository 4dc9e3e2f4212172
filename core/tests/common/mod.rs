// tests/common/mod.rs
#![allow(dead_code)] // Not every test file uses every helper

use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use std::sync::Arc;
use storefront::{
  CallbackOutcome, CartManager, Catalog, CheckoutOrchestrator, CheckoutSession, CheckoutSettings, MemoryStore,
  MockGateway, Money, NewProduct, Orders, PaymentCallback, PaymentCallbackHandler, Product, Store,
};
use tracing::Level;
use uuid::Uuid;

// --- Tracing ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Wired services over a fresh in-memory store and mock gateway ---
pub struct Shop {
  pub store: Arc<MemoryStore>,
  pub gateway: Arc<MockGateway>,
  pub catalog: Catalog,
  pub carts: CartManager,
  pub checkout: CheckoutOrchestrator,
  pub callbacks: PaymentCallbackHandler,
  pub orders: Orders,
}

impl Shop {
  pub fn new() -> Self {
    setup_tracing();
    let store = Arc::new(MemoryStore::new());
    let gateway = Arc::new(MockGateway::default());
    let dyn_store: Arc<dyn Store> = store.clone();
    Self {
      catalog: Catalog::new(dyn_store.clone()),
      carts: CartManager::new(dyn_store.clone()),
      checkout: CheckoutOrchestrator::new(dyn_store.clone(), gateway.clone(), CheckoutSettings::default()),
      callbacks: PaymentCallbackHandler::new(dyn_store.clone(), gateway.clone()),
      orders: Orders::new(dyn_store),
      store,
      gateway,
    }
  }

  pub async fn product(&self, name: &str, price: Decimal) -> Product {
    self
      .store
      .insert_product(NewProduct {
        name: name.to_string(),
        description: format!("{} description", name),
        price: Money::new(price),
        stock: 10,
      })
      .await
      .expect("seeding a product should succeed")
  }

  /// A callback the mock gateway will accept for this session.
  pub fn signed_callback(&self, session: &CheckoutSession, payment_id: &str) -> PaymentCallback {
    PaymentCallback {
      gateway_order_id: Some(session.gateway_order_id.clone()),
      gateway_payment_id: Some(payment_id.to_string()),
      gateway_signature: Some(
        self
          .gateway
          .sign(&session.gateway_order_id, payment_id)
          .expect("mock signing should succeed"),
      ),
    }
  }

  pub fn forged_callback(&self, session: &CheckoutSession) -> PaymentCallback {
    PaymentCallback {
      gateway_order_id: Some(session.gateway_order_id.clone()),
      gateway_payment_id: Some("pay_forged".to_string()),
      gateway_signature: Some("deadbeef".to_string()),
    }
  }

  pub async fn cart_quantities(&self, user_id: Uuid) -> Vec<(String, i32)> {
    let view = self.carts.view_cart(user_id).await.expect("cart view should load");
    let mut quantities: Vec<(String, i32)> = view
      .lines
      .into_iter()
      .map(|line| (line.product.name, line.item.quantity))
      .collect();
    quantities.sort();
    quantities
  }
}

pub fn paid_order(outcome: &CallbackOutcome) -> &storefront::Order {
  match outcome {
    CallbackOutcome::Paid { order } => order,
    other => panic!("Expected CallbackOutcome::Paid, got {:?}", other),
  }
}
