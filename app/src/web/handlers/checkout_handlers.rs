// storefront_app/src/web/handlers/checkout_handlers.rs

use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;
use storefront::ShopError;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;
use crate::web::flash::{redirect_with_flash, take_flash};

pub const CALLBACK_PATH: &str = "/checkout/callback/";

/// Opens the local and gateway orders and returns what the gateway's
/// payment form needs. An empty cart sends the user back to the catalog.
#[instrument(name = "handler::start_checkout", skip(app_state, req, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn start_checkout_handler(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let session = match app_state.checkout.start_checkout(auth_user.user_id).await {
    Ok(session) => session,
    Err(ShopError::EmptyCart) => {
      warn!("Checkout attempted with an empty cart.");
      return Ok(redirect_with_flash("/", &ShopError::EmptyCart.to_string()));
    }
    Err(other) => return Err(other.into()),
  };
  info!(order_id = %session.order_id, gateway_order_id = %session.gateway_order_id, "Checkout started.");

  let mut response = HttpResponse::Ok();
  let flash = take_flash(&req, &mut response);
  Ok(response.json(json!({
      "checkout": session,
      "callback_url": CALLBACK_PATH,
      "flash": flash,
  })))
}
