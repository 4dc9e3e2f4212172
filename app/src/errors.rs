// storefront_app/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use storefront::ShopError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error(transparent)]
  Shop(#[from] ShopError),

  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<sqlx::Error>() {
      Ok(sqlx_error) => AppError::Sqlx(sqlx_error),
      Err(other) => AppError::Internal(other.to_string()),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Shop(shop) => match shop {
        ShopError::NotFound { .. } => StatusCode::NOT_FOUND,
        ShopError::Forbidden { .. } => StatusCode::FORBIDDEN,
        ShopError::BadRequest(_) => StatusCode::BAD_REQUEST,
        ShopError::Gateway { .. } => StatusCode::BAD_GATEWAY,
        // Handlers turn these into a flash and a redirect; reaching here
        // means a caller let one escape.
        ShopError::EmptyCart => StatusCode::BAD_REQUEST,
        ShopError::Signature { .. } => StatusCode::BAD_REQUEST,
        ShopError::Storage { .. } | ShopError::Flow(_) => StatusCode::INTERNAL_SERVER_ERROR,
      },
      AppError::Auth(_) => StatusCode::UNAUTHORIZED,
      AppError::Config(_) | AppError::Sqlx(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    tracing::error!(application_error = %self, "Responding with error");
    let status = self.status_code();
    let body = match self {
      AppError::Shop(ShopError::Storage { .. } | ShopError::Flow(_)) => json!({"error": "An internal error occurred"}),
      AppError::Shop(ShopError::Gateway { .. }) => json!({"error": "Payment provider error"}),
      AppError::Sqlx(_) => json!({"error": "Database operation failed"}),
      AppError::Config(m) => json!({"error": "Configuration issue", "detail": m}),
      AppError::Internal(m) => json!({"error": "An internal error occurred", "detail": m}),
      other => json!({"error": other.to_string()}),
    };
    HttpResponse::build(status).json(body)
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
