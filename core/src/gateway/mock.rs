// storefront/src/gateway/mock.rs

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::error::{ShopError, ShopResult};
use crate::gateway::razorpay::{payment_signature, verify_payment_signature};
use crate::gateway::{CreateOrderRequest, GatewayOrder, PaymentGateway};

/// In-process gateway used by tests and local runs without credentials.
///
/// Orders get `mock_order_*` ids and signatures follow the same HMAC scheme
/// as Razorpay, keyed with `key_secret`, so [`MockGateway::sign`] produces
/// callbacks that verify.
pub struct MockGateway {
  key_id: String,
  key_secret: String,
  fail_create: AtomicBool,
  created: Mutex<Vec<CreateOrderRequest>>,
}

impl MockGateway {
  pub fn new(key_id: impl Into<String>, key_secret: impl Into<String>) -> Self {
    Self {
      key_id: key_id.into(),
      key_secret: key_secret.into(),
      fail_create: AtomicBool::new(false),
      created: Mutex::new(Vec::new()),
    }
  }

  /// Makes every following `create_order` call fail until reset.
  pub fn set_fail_create(&self, fail: bool) {
    self.fail_create.store(fail, Ordering::SeqCst);
  }

  /// Requests received so far, oldest first.
  pub fn created_orders(&self) -> Vec<CreateOrderRequest> {
    self.created.lock().clone()
  }

  pub fn sign(&self, order_id: &str, payment_id: &str) -> ShopResult<String> {
    payment_signature(&self.key_secret, order_id, payment_id)
  }
}

impl Default for MockGateway {
  fn default() -> Self {
    Self::new("mock_key_id", "mock_key_secret")
  }
}

#[async_trait]
impl PaymentGateway for MockGateway {
  fn key_id(&self) -> &str {
    &self.key_id
  }

  #[instrument(name = "mock_gateway::create_order", skip(self, request), fields(amount_minor = request.amount_minor))]
  async fn create_order(&self, request: CreateOrderRequest) -> ShopResult<GatewayOrder> {
    if self.fail_create.load(Ordering::SeqCst) {
      warn!("Simulated gateway failure.");
      return Err(ShopError::gateway(anyhow::anyhow!("simulated gateway outage")));
    }
    let order = GatewayOrder {
      id: format!("mock_order_{}", Uuid::new_v4().simple()),
    };
    info!(gateway_order_id = %order.id, "Mock gateway order created.");
    self.created.lock().push(request);
    Ok(order)
  }

  fn verify_signature(&self, payment: &crate::gateway::PaymentSignature) -> ShopResult<()> {
    verify_payment_signature(&self.key_secret, payment)
  }
}
