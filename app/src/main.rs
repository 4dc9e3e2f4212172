// storefront_app/src/main.rs

mod config;
mod db;
mod errors;
mod seed;
mod state;
mod web;

use crate::config::AppConfig;
use crate::db::PgStore;
use crate::errors::{AppError, Result as AppResult};
use crate::state::AppState;

use actix_web::{web as actix_data, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use storefront::{MemoryStore, MockGateway, PaymentGateway, RazorpayConfig, RazorpayGateway, Store};
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

async fn build_store(config: &AppConfig) -> AppResult<Arc<dyn Store>> {
  match &config.database_url {
    Some(url) => {
      let pool = PgPoolOptions::new().max_connections(10).connect(url).await?;
      tracing::info!("Successfully connected to the database.");
      Ok(Arc::new(PgStore::new(pool)))
    }
    None => {
      tracing::warn!("DATABASE_URL not set; using the in-memory store. Data is lost on restart.");
      Ok(Arc::new(MemoryStore::new()))
    }
  }
}

fn build_gateway(config: &AppConfig) -> AppResult<Arc<dyn PaymentGateway>> {
  if config.use_mock_gateway {
    tracing::warn!("USE_MOCK_GATEWAY is set; payments are simulated.");
    return Ok(Arc::new(MockGateway::new(
      config.razorpay_key_id.clone(),
      config.razorpay_key_secret.clone(),
    )));
  }
  let gateway = RazorpayGateway::new(RazorpayConfig {
    key_id: config.razorpay_key_id.clone(),
    key_secret: config.razorpay_key_secret.clone(),
    api_base: config.razorpay_api_base.clone(),
    timeout: config.gateway_timeout,
  })?;
  Ok(Arc::new(gateway))
}

async fn build_state() -> AppResult<AppState> {
  let config = Arc::new(AppConfig::from_env()?);
  let store = build_store(&config).await?;
  if config.seed_db {
    seed::seed_catalog(store.as_ref()).await?;
  }
  let gateway = build_gateway(&config)?;
  Ok(AppState::new(store, gateway, config))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting storefront server...");

  let app_state = build_state().await.map_err(|e: AppError| {
    tracing::error!(error = %e, "Failed to initialise the application.");
    std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
  })?;

  let server_address = format!("{}:{}", app_state.config.server_host, app_state.config.server_port);
  tracing::info!("Binding server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
