// storefront_app/src/web/tests.rs

use actix_web::cookie::Cookie;
use actix_web::http::header::{LOCATION, SET_COOKIE};
use actix_web::http::StatusCode;
use actix_web::{test, web as actix_data, App};
use rust_decimal_macros::dec;
use serde_json::Value;
use std::sync::Arc;
use storefront::{MemoryStore, MockGateway, Money, NewProduct, Product, Store};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::state::AppState;
use crate::web::configure_app_routes;
use crate::web::extractors::USER_ID_HEADER;
use crate::web::flash::FLASH_COOKIE;

struct Harness {
  state: AppState,
  store: Arc<MemoryStore>,
  gateway: Arc<MockGateway>,
}

fn test_config() -> AppConfig {
  AppConfig::from_lookup(|name| match name {
    "USE_MOCK_GATEWAY" => Some("true".to_string()),
    _ => None,
  })
  .expect("mock config should load")
}

fn harness() -> Harness {
  let store = Arc::new(MemoryStore::new());
  let gateway = Arc::new(MockGateway::default());
  let state = AppState::new(store.clone(), gateway.clone(), Arc::new(test_config()));
  Harness { state, store, gateway }
}

async fn seed(store: &MemoryStore, name: &str, price: rust_decimal::Decimal) -> Product {
  store
    .insert_product(NewProduct {
      name: name.to_string(),
      description: String::new(),
      price: Money::new(price),
      stock: 5,
    })
    .await
    .expect("seed product")
}

fn location(resp: &actix_web::dev::ServiceResponse) -> &str {
  resp
    .headers()
    .get(LOCATION)
    .and_then(|v| v.to_str().ok())
    .unwrap_or_default()
}

fn flash(resp: &actix_web::dev::ServiceResponse) -> Option<String> {
  resp
    .response()
    .cookies()
    .find(|c| c.name() == FLASH_COOKIE)
    .map(|c| c.value().to_string())
}

macro_rules! app {
  ($h:expr) => {
    test::init_service(
      App::new()
        .app_data(actix_data::Data::new($h.state.clone()))
        .configure(configure_app_routes),
    )
    .await
  };
}

#[actix_web::test]
async fn health_is_ok() {
  let h = harness();
  let app = app!(h);
  let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn catalog_lists_products_at_root_and_products_path() {
  let h = harness();
  seed(&h.store, "Mug", dec!(4.50)).await;
  seed(&h.store, "Lamp", dec!(30.00)).await;
  let app = app!(h);

  for uri in ["/", "/products/"] {
    let body: Value = test::call_and_read_body_json(&app, test::TestRequest::get().uri(uri).to_request()).await;
    let names: Vec<&str> = body["products"]
      .as_array()
      .unwrap()
      .iter()
      .map(|p| p["name"].as_str().unwrap())
      .collect();
    assert_eq!(names, vec!["Lamp", "Mug"]);
  }
}

#[actix_web::test]
async fn product_detail_and_unknown_product() {
  let h = harness();
  let mug = seed(&h.store, "Mug", dec!(4.50)).await;
  let app = app!(h);

  let resp = test::call_service(
    &app,
    test::TestRequest::get().uri(&format!("/products/{}/", mug.id)).to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);

  let resp = test::call_service(
    &app,
    test::TestRequest::get().uri(&format!("/products/{}/", Uuid::new_v4())).to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn cart_routes_require_a_user() {
  let h = harness();
  let app = app!(h);
  for uri in ["/cart/", "/checkout/", "/order/success/"] {
    let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{}", uri);
  }
}

#[actix_web::test]
async fn add_update_and_remove_redirect_to_cart() {
  let h = harness();
  let mug = seed(&h.store, "Mug", dec!(4.50)).await;
  let user = Uuid::new_v4().to_string();
  let app = app!(h);

  for _ in 0..2 {
    let resp = test::call_service(
      &app,
      test::TestRequest::post()
        .uri(&format!("/cart/add/{}/", mug.id))
        .insert_header((USER_ID_HEADER, user.as_str()))
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/cart/");
  }

  let cart: Value = test::call_and_read_body_json(
    &app,
    test::TestRequest::get()
      .uri("/cart/")
      .insert_header((USER_ID_HEADER, user.as_str()))
      .to_request(),
  )
  .await;
  let lines = cart["cart"]["lines"].as_array().unwrap();
  assert_eq!(lines.len(), 1);
  assert_eq!(lines[0]["item"]["quantity"], 2);
  assert_eq!(cart["cart"]["total"], "9.00");
  let item_id = lines[0]["item"]["id"].as_str().unwrap().to_string();

  let resp = test::call_service(
    &app,
    test::TestRequest::post()
      .uri(&format!("/cart/item/{}/update/", item_id))
      .insert_header((USER_ID_HEADER, user.as_str()))
      .set_form([("quantity", "5")])
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);

  let cart: Value = test::call_and_read_body_json(
    &app,
    test::TestRequest::get()
      .uri("/cart/")
      .insert_header((USER_ID_HEADER, user.as_str()))
      .to_request(),
  )
  .await;
  assert_eq!(cart["cart"]["lines"][0]["item"]["quantity"], 5);

  let resp = test::call_service(
    &app,
    test::TestRequest::get()
      .uri(&format!("/cart/item/{}/remove/", item_id))
      .insert_header((USER_ID_HEADER, user.as_str()))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);

  let cart: Value = test::call_and_read_body_json(
    &app,
    test::TestRequest::get()
      .uri("/cart/")
      .insert_header((USER_ID_HEADER, user.as_str()))
      .to_request(),
  )
  .await;
  assert!(cart["cart"]["lines"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn update_with_zero_quantity_deletes_and_other_methods_are_rejected() {
  let h = harness();
  let mug = seed(&h.store, "Mug", dec!(4.50)).await;
  let user = Uuid::new_v4();
  let item = h.state.carts.add_item(user, mug.id).await.unwrap();
  let app = app!(h);
  let uri = format!("/cart/item/{}/update/", item.id);

  let resp = test::call_service(
    &app,
    test::TestRequest::get()
      .uri(&uri)
      .insert_header((USER_ID_HEADER, user.to_string()))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  let resp = test::call_service(
    &app,
    test::TestRequest::post()
      .uri(&uri)
      .insert_header((USER_ID_HEADER, user.to_string()))
      .set_form([("quantity", "0")])
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert!(h.state.carts.view_cart(user).await.unwrap().lines.is_empty());
}

#[actix_web::test]
async fn another_users_item_is_forbidden() {
  let h = harness();
  let mug = seed(&h.store, "Mug", dec!(4.50)).await;
  let owner = Uuid::new_v4();
  let item = h.state.carts.add_item(owner, mug.id).await.unwrap();
  let app = app!(h);

  let resp = test::call_service(
    &app,
    test::TestRequest::post()
      .uri(&format!("/cart/item/{}/remove/", item.id))
      .insert_header((USER_ID_HEADER, Uuid::new_v4().to_string()))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);
  assert_eq!(h.state.carts.view_cart(owner).await.unwrap().lines.len(), 1);
}

#[actix_web::test]
async fn empty_cart_checkout_flashes_and_redirects_home() {
  let h = harness();
  let app = app!(h);

  let resp = test::call_service(
    &app,
    test::TestRequest::get()
      .uri("/checkout/")
      .insert_header((USER_ID_HEADER, Uuid::new_v4().to_string()))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert_eq!(location(&resp), "/");
  assert_eq!(flash(&resp).as_deref(), Some("Your cart is empty."));
  assert_eq!(h.store.order_count(), 0);

  // The catalog page shows the message once.
  let body: Value = test::call_and_read_body_json(
    &app,
    test::TestRequest::get()
      .uri("/")
      .cookie(Cookie::new(FLASH_COOKIE, "Your cart is empty."))
      .to_request(),
  )
  .await;
  assert_eq!(body["flash"], "Your cart is empty.");
}

#[actix_web::test]
async fn checkout_then_signed_callback_reaches_order_success() {
  let h = harness();
  let lamp = seed(&h.store, "Lamp", dec!(30.00)).await;
  let user = Uuid::new_v4();
  h.state.carts.add_item(user, lamp.id).await.unwrap();
  let app = app!(h);

  let body: Value = test::call_and_read_body_json(
    &app,
    test::TestRequest::get()
      .uri("/checkout/")
      .insert_header((USER_ID_HEADER, user.to_string()))
      .to_request(),
  )
  .await;
  assert_eq!(body["checkout"]["amount_minor"], 3000);
  assert_eq!(body["checkout"]["currency"], "INR");
  assert_eq!(body["callback_url"], "/checkout/callback/");
  let gateway_order_id = body["checkout"]["gateway_order_id"].as_str().unwrap().to_string();
  let signature = h.gateway.sign(&gateway_order_id, "pay_http").unwrap();

  let resp = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/checkout/callback/")
      .set_form([
        ("razorpay_order_id", gateway_order_id.as_str()),
        ("razorpay_payment_id", "pay_http"),
        ("razorpay_signature", signature.as_str()),
      ])
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert_eq!(location(&resp), "/order/success/");

  let body: Value = test::call_and_read_body_json(
    &app,
    test::TestRequest::get()
      .uri("/order/success/")
      .insert_header((USER_ID_HEADER, user.to_string()))
      .to_request(),
  )
  .await;
  assert_eq!(body["order"]["status"], "paid");
  assert_eq!(body["order"]["gateway_payment_id"], "pay_http");
  assert!(h.state.carts.view_cart(user).await.unwrap().lines.is_empty());
}

#[actix_web::test]
async fn forged_callback_flashes_and_returns_to_checkout() {
  let h = harness();
  let lamp = seed(&h.store, "Lamp", dec!(30.00)).await;
  let user = Uuid::new_v4();
  h.state.carts.add_item(user, lamp.id).await.unwrap();
  let session = h.state.checkout.start_checkout(user).await.unwrap();
  let app = app!(h);

  let resp = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/checkout/callback/")
      .set_form([
        ("razorpay_order_id", session.gateway_order_id.as_str()),
        ("razorpay_payment_id", "pay_forged"),
        ("razorpay_signature", "00ff"),
      ])
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert_eq!(location(&resp), "/checkout/");
  assert_eq!(flash(&resp).as_deref(), Some("Payment verification failed."));
  assert_eq!(h.state.carts.view_cart(user).await.unwrap().lines.len(), 1);
}

#[actix_web::test]
async fn callback_without_fields_redirects_home() {
  let h = harness();
  let app = app!(h);

  let resp = test::call_service(&app, test::TestRequest::post().uri("/checkout/callback/").to_request()).await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert_eq!(location(&resp), "/");
}

#[actix_web::test]
async fn gateway_outage_is_a_bad_gateway() {
  let h = harness();
  let lamp = seed(&h.store, "Lamp", dec!(30.00)).await;
  let user = Uuid::new_v4();
  h.state.carts.add_item(user, lamp.id).await.unwrap();
  h.gateway.set_fail_create(true);
  let app = app!(h);

  let resp = test::call_service(
    &app,
    test::TestRequest::get()
      .uri("/checkout/")
      .insert_header((USER_ID_HEADER, user.to_string()))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
  assert_eq!(h.store.order_count(), 1);
}

#[actix_web::test]
async fn flash_cookie_value_is_percent_encoded() {
  let h = harness();
  let app = app!(h);

  let resp = test::call_service(
    &app,
    test::TestRequest::get()
      .uri("/checkout/")
      .insert_header((USER_ID_HEADER, Uuid::new_v4().to_string()))
      .to_request(),
  )
  .await;

  let set_cookie = resp
    .headers()
    .get(SET_COOKIE)
    .and_then(|v| v.to_str().ok())
    .unwrap_or_default()
    .to_string();
  let value = set_cookie
    .strip_prefix("flash=")
    .and_then(|rest| rest.split(';').next())
    .unwrap_or_default();
  assert_eq!(value, "Your%20cart%20is%20empty.");
  assert_eq!(flash(&resp).as_deref(), Some("Your cart is empty."));

  // Sent back as-is by the browser, the message decodes on the next page.
  let body: Value = test::call_and_read_body_json(
    &app,
    test::TestRequest::get()
      .uri("/products/")
      .insert_header(("Cookie", format!("flash={}", value)))
      .to_request(),
  )
  .await;
  assert_eq!(body["flash"], "Your cart is empty.");
}

#[actix_web::test]
async fn non_post_callback_redirects_to_catalog() {
  let h = harness();
  let app = app!(h);

  for req in [
    test::TestRequest::get().uri("/checkout/callback/").to_request(),
    test::TestRequest::put().uri("/checkout/callback/").to_request(),
  ] {
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");
  }
}
