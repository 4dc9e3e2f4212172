// storefront/src/gateway/mod.rs

//! The payment-gateway port.
//!
//! The gateway is injected into checkout and callback processing as an
//! `Arc<dyn PaymentGateway>`, built once from credentials at startup.

pub mod mock;
pub mod razorpay;

pub use mock::MockGateway;
pub use razorpay::{RazorpayConfig, RazorpayGateway};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ShopResult;

/// Whether the gateway captures the payment as soon as it is authorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureMode {
  Automatic,
  Manual,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateOrderRequest {
  pub amount_minor: i64,
  pub currency: String,
  pub capture: CaptureMode,
  /// Free-form correlation data echoed back by the gateway.
  pub notes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GatewayOrder {
  pub id: String,
}

/// The (order id, payment id, signature) triple posted back after payment.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentSignature {
  pub order_id: String,
  pub payment_id: String,
  pub signature: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
  /// Public key id the browser-side payment form is rendered with.
  fn key_id(&self) -> &str;

  /// Creates a remote payment order. Transport and API failures come back
  /// as `ShopError::Gateway`.
  async fn create_order(&self, request: CreateOrderRequest) -> ShopResult<GatewayOrder>;

  /// Pass/fail oracle over the posted triple: `Ok(())` when authentic,
  /// `ShopError::Signature` otherwise.
  fn verify_signature(&self, payment: &PaymentSignature) -> ShopResult<()>;
}
