// storefront_app/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::flash::take_flash;

#[instrument(name = "handler::list_products", skip(app_state, req))]
pub async fn list_products_handler(app_state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse, AppError> {
  let products = app_state.catalog.list_products().await?;
  info!(count = products.len(), "Products listed.");

  let mut response = HttpResponse::Ok();
  let flash = take_flash(&req, &mut response);
  Ok(response.json(json!({
      "products": products,
      "flash": flash,
  })))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn get_product_handler(app_state: web::Data<AppState>, path: web::Path<Uuid>) -> Result<HttpResponse, AppError> {
  let product = app_state.catalog.get_product(path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({ "product": product })))
}
