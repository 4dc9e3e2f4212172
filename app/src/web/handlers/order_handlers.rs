// storefront_app/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::instrument;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[instrument(name = "handler::order_success", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn order_success_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let order = app_state.orders.latest_paid_order(auth_user.user_id).await?;
  Ok(HttpResponse::Ok().json(json!({ "order": order })))
}
