// storefront/src/gateway/razorpay.rs

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{info, instrument, warn};

use crate::error::{ShopError, ShopResult};
use crate::gateway::{CaptureMode, CreateOrderRequest, GatewayOrder, PaymentGateway, PaymentSignature};

type HmacSha256 = Hmac<Sha256>;

pub const DEFAULT_API_BASE: &str = "https://api.razorpay.com";

#[derive(Debug, Clone)]
pub struct RazorpayConfig {
  pub key_id: String,
  pub key_secret: String,
  pub api_base: String,
  pub timeout: Duration,
}

/// Razorpay Orders API client plus payment-signature verification.
pub struct RazorpayGateway {
  config: RazorpayConfig,
  client: reqwest::Client,
}

#[derive(Serialize)]
struct OrderBody<'a> {
  amount: i64,
  currency: &'a str,
  payment_capture: u8,
  notes: &'a BTreeMap<String, String>,
}

impl RazorpayGateway {
  pub fn new(config: RazorpayConfig) -> ShopResult<Self> {
    let client = reqwest::Client::builder()
      .timeout(config.timeout)
      .build()
      .map_err(ShopError::gateway)?;
    Ok(Self { config, client })
  }
}

fn keyed_mac(key_secret: &str, order_id: &str, payment_id: &str) -> ShopResult<HmacSha256> {
  let mut mac = HmacSha256::new_from_slice(key_secret.as_bytes())
    .map_err(|e| ShopError::gateway(anyhow::anyhow!("invalid HMAC key: {}", e)))?;
  mac.update(format!("{}|{}", order_id, payment_id).as_bytes());
  Ok(mac)
}

/// Hex HMAC-SHA256 of `"{order_id}|{payment_id}"` keyed with the account
/// secret, which is what Razorpay posts back as the payment signature.
pub fn payment_signature(key_secret: &str, order_id: &str, payment_id: &str) -> ShopResult<String> {
  let mac = keyed_mac(key_secret, order_id, payment_id)?;
  Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Constant-time check of a posted signature against the expected HMAC.
pub fn verify_payment_signature(key_secret: &str, payment: &PaymentSignature) -> ShopResult<()> {
  let rejected = || ShopError::Signature {
    order_id: payment.order_id.clone(),
  };
  let provided = hex::decode(payment.signature.trim()).map_err(|_| rejected())?;
  keyed_mac(key_secret, &payment.order_id, &payment.payment_id)?
    .verify_slice(&provided)
    .map_err(|_| rejected())
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
  fn key_id(&self) -> &str {
    &self.config.key_id
  }

  #[instrument(name = "razorpay::create_order", skip(self, request), fields(amount_minor = request.amount_minor, currency = %request.currency), err(Display))]
  async fn create_order(&self, request: CreateOrderRequest) -> ShopResult<GatewayOrder> {
    let body = OrderBody {
      amount: request.amount_minor,
      currency: &request.currency,
      payment_capture: match request.capture {
        CaptureMode::Automatic => 1,
        CaptureMode::Manual => 0,
      },
      notes: &request.notes,
    };
    let url = format!("{}/v1/orders", self.config.api_base.trim_end_matches('/'));

    let response = self
      .client
      .post(&url)
      .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
      .json(&body)
      .send()
      .await
      .map_err(ShopError::gateway)?;

    let status = response.status();
    if !status.is_success() {
      let detail = response.text().await.unwrap_or_default();
      warn!(%status, "Razorpay rejected order creation.");
      return Err(ShopError::gateway(anyhow::anyhow!(
        "Razorpay returned {}: {}",
        status,
        detail
      )));
    }

    let order: GatewayOrder = response.json().await.map_err(ShopError::gateway)?;
    info!(gateway_order_id = %order.id, "Razorpay order created.");
    Ok(order)
  }

  fn verify_signature(&self, payment: &PaymentSignature) -> ShopResult<()> {
    verify_payment_signature(&self.config.key_secret, payment)
  }
}
