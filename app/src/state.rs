// storefront_app/src/state.rs
use crate::config::AppConfig;
use std::sync::Arc;
use storefront::{
  CartManager, Catalog, CheckoutOrchestrator, CheckoutSettings, Orders, PaymentCallbackHandler, PaymentGateway, Store,
};

#[derive(Clone)]
pub struct AppState {
  pub catalog: Catalog,
  pub carts: CartManager,
  pub checkout: CheckoutOrchestrator,
  pub callbacks: PaymentCallbackHandler,
  pub orders: Orders,
  pub config: Arc<AppConfig>,
}

impl AppState {
  pub fn new(store: Arc<dyn Store>, gateway: Arc<dyn PaymentGateway>, config: Arc<AppConfig>) -> Self {
    let settings = CheckoutSettings {
      currency: config.store_currency.clone(),
    };
    Self {
      catalog: Catalog::new(store.clone()),
      carts: CartManager::new(store.clone()),
      checkout: CheckoutOrchestrator::new(store.clone(), gateway.clone(), settings),
      callbacks: PaymentCallbackHandler::new(store.clone(), gateway),
      orders: Orders::new(store),
      config,
    }
  }
}
