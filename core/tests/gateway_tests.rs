// tests/gateway_tests.rs
mod common;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::Duration;
use storefront::gateway::razorpay::{payment_signature, verify_payment_signature, DEFAULT_API_BASE};
use storefront::{MockGateway, PaymentGateway, PaymentSignature, RazorpayConfig, RazorpayGateway, ShopError};

const SECRET: &str = "rzp_test_secret_123";

fn reference_signature(secret: &str, order_id: &str, payment_id: &str) -> String {
  let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
  mac.update(format!("{}|{}", order_id, payment_id).as_bytes());
  hex::encode(mac.finalize().into_bytes())
}

fn triple(order_id: &str, payment_id: &str, signature: String) -> PaymentSignature {
  PaymentSignature {
    order_id: order_id.to_string(),
    payment_id: payment_id.to_string(),
    signature,
  }
}

#[test]
fn test_signature_matches_reference_hmac() {
  assert_eq!(
    payment_signature(SECRET, "order_A", "pay_B").unwrap(),
    reference_signature(SECRET, "order_A", "pay_B")
  );
}

#[test]
fn test_valid_signature_is_accepted() {
  let signature = reference_signature(SECRET, "order_A", "pay_B");
  assert!(verify_payment_signature(SECRET, &triple("order_A", "pay_B", signature)).is_ok());
}

#[test]
fn test_uppercase_hex_signature_is_accepted() {
  let signature = reference_signature(SECRET, "order_A", "pay_B").to_uppercase();
  assert!(verify_payment_signature(SECRET, &triple("order_A", "pay_B", signature)).is_ok());
}

#[test]
fn test_signature_from_wrong_secret_is_rejected() {
  let signature = reference_signature("wrong_secret", "order_A", "pay_B");
  let err = verify_payment_signature(SECRET, &triple("order_A", "pay_B", signature)).unwrap_err();
  assert!(matches!(err, ShopError::Signature { ref order_id } if order_id == "order_A"), "got {:?}", err);
}

#[test]
fn test_signature_for_other_payment_is_rejected() {
  let signature = reference_signature(SECRET, "order_A", "pay_B");
  assert!(verify_payment_signature(SECRET, &triple("order_A", "pay_C", signature)).is_err());
}

#[test]
fn test_garbage_and_empty_signatures_are_rejected() {
  assert!(verify_payment_signature(SECRET, &triple("order_A", "pay_B", "not-hex".to_string())).is_err());
  assert!(verify_payment_signature(SECRET, &triple("order_A", "pay_B", String::new())).is_err());
}

#[test]
fn test_razorpay_gateway_verifies_with_its_secret() {
  let gateway = RazorpayGateway::new(RazorpayConfig {
    key_id: "rzp_test_key".to_string(),
    key_secret: SECRET.to_string(),
    api_base: DEFAULT_API_BASE.to_string(),
    timeout: Duration::from_secs(5),
  })
  .unwrap();

  assert_eq!(gateway.key_id(), "rzp_test_key");
  let signature = reference_signature(SECRET, "order_A", "pay_B");
  assert!(gateway.verify_signature(&triple("order_A", "pay_B", signature)).is_ok());
}

#[test]
fn test_mock_gateway_signs_what_it_verifies() {
  let gateway = MockGateway::new("key", "mock_secret");
  let signature = gateway.sign("mock_order_1", "pay_1").unwrap();
  assert!(gateway.verify_signature(&triple("mock_order_1", "pay_1", signature.clone())).is_ok());
  assert!(gateway.verify_signature(&triple("mock_order_2", "pay_1", signature)).is_err());
}
