// storefront_app/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use storefront::parse_quantity;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;
use crate::web::flash::{redirect, take_flash};

const CART_PATH: &str = "/cart/";

/// Raw form field; `parse_quantity` decides what a bad value means.
#[derive(Deserialize, Debug, Default)]
pub struct QuantityForm {
  pub quantity: Option<String>,
}

#[instrument(
    name = "handler::add_to_cart",
    skip(app_state, path, auth_user),
    fields(user_id = %auth_user.user_id, product_id = %path.as_ref())
)]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let item = app_state.carts.add_item(auth_user.user_id, path.into_inner()).await?;
  info!(item_id = %item.id, quantity = item.quantity, "Item added to cart.");
  Ok(redirect(CART_PATH))
}

#[instrument(name = "handler::view_cart", skip(app_state, req, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn view_cart_handler(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let view = app_state.carts.view_cart(auth_user.user_id).await?;

  let mut response = HttpResponse::Ok();
  let flash = take_flash(&req, &mut response);
  Ok(response.json(json!({
      "cart": view,
      "flash": flash,
  })))
}

#[instrument(
    name = "handler::update_cart_item",
    skip(app_state, path, form, auth_user),
    fields(user_id = %auth_user.user_id, item_id = %path.as_ref())
)]
pub async fn update_cart_item_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  form: Option<web::Form<QuantityForm>>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let form = form.map(web::Form::into_inner).unwrap_or_default();
  let quantity = parse_quantity(form.quantity.as_deref());
  let updated = app_state
    .carts
    .set_item_quantity(auth_user.user_id, path.into_inner(), quantity)
    .await?;
  match updated {
    Some(item) => info!(quantity = item.quantity, "Cart item quantity set."),
    None => info!("Cart item removed by quantity update."),
  }
  Ok(redirect(CART_PATH))
}

#[instrument(
    name = "handler::remove_cart_item",
    skip(app_state, path, auth_user),
    fields(user_id = %auth_user.user_id, item_id = %path.as_ref())
)]
pub async fn remove_cart_item_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  app_state.carts.remove_item(auth_user.user_id, path.into_inner()).await?;
  Ok(redirect(CART_PATH))
}
