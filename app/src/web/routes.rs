// storefront_app/src/web/routes.rs

use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::web::handlers::{callback_handlers, cart_handlers, checkout_handlers, order_handlers, product_handlers};

async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(json!({ "status": "ok" }))
}

/// Answers any method other than the resource's own with 400.
async fn method_not_accepted() -> HttpResponse {
  HttpResponse::BadRequest().json(json!({ "error": "Invalid request method." }))
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .route("/health", web::get().to(health_check_handler))
    // Catalog
    .route("/", web::get().to(product_handlers::list_products_handler))
    .route("/products/", web::get().to(product_handlers::list_products_handler))
    .route(
      "/products/{product_id}/",
      web::get().to(product_handlers::get_product_handler),
    )
    // Cart
    .service(
      web::resource("/cart/add/{product_id}/")
        .route(web::get().to(cart_handlers::add_to_cart_handler))
        .route(web::post().to(cart_handlers::add_to_cart_handler)),
    )
    .route("/cart/", web::get().to(cart_handlers::view_cart_handler))
    .service(
      web::resource("/cart/item/{item_id}/update/")
        .route(web::post().to(cart_handlers::update_cart_item_handler))
        .default_service(web::to(method_not_accepted)),
    )
    .service(
      web::resource("/cart/item/{item_id}/remove/")
        .route(web::get().to(cart_handlers::remove_cart_item_handler))
        .route(web::post().to(cart_handlers::remove_cart_item_handler)),
    )
    // Checkout
    .route("/checkout/", web::get().to(checkout_handlers::start_checkout_handler))
    .service(
      web::resource("/checkout/callback/")
        .route(web::post().to(callback_handlers::payment_callback_handler))
        .default_service(web::to(callback_handlers::callback_method_redirect)),
    )
    .route("/order/success/", web::get().to(order_handlers::order_success_handler));
}
