// storefront_app/src/web/handlers/callback_handlers.rs

use actix_web::{web, HttpResponse};
use storefront::{CallbackOutcome, OrderStatus, PaymentCallback};
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::flash::{redirect, redirect_with_flash};

pub const PAYMENT_FAILED_MESSAGE: &str = "Payment verification failed.";

/// Gateway postback. Unauthenticated: the signature is the credential.
#[instrument(name = "handler::payment_callback", skip(app_state, form))]
pub async fn payment_callback_handler(
  app_state: web::Data<AppState>,
  form: Option<web::Form<PaymentCallback>>,
) -> Result<HttpResponse, AppError> {
  let callback = form.map(web::Form::into_inner).unwrap_or_default();

  let response = match app_state.callbacks.handle(callback).await? {
    CallbackOutcome::Paid { order } => {
      info!(order_id = %order.id, "Payment confirmed.");
      redirect("/order/success/")
    }
    CallbackOutcome::Failed { order } => {
      warn!(order_id = %order.id, "Payment verification failed.");
      redirect_with_flash("/checkout/", PAYMENT_FAILED_MESSAGE)
    }
    CallbackOutcome::AlreadySettled { order } if order.status == OrderStatus::Paid => redirect("/order/success/"),
    CallbackOutcome::AlreadySettled { .. } => redirect_with_flash("/checkout/", PAYMENT_FAILED_MESSAGE),
    CallbackOutcome::Ignored => redirect("/"),
  };
  Ok(response)
}

/// Anything but a POST to the callback URL goes back to the catalog.
pub async fn callback_method_redirect() -> HttpResponse {
  redirect("/")
}
