// storefront_app/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use storefront::gateway::razorpay::DEFAULT_API_BASE;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  /// `None` runs the storefront on the in-memory store.
  pub database_url: Option<String>,

  pub razorpay_key_id: String,
  pub razorpay_key_secret: String,
  pub razorpay_api_base: String,
  pub gateway_timeout: Duration,
  pub use_mock_gateway: bool,

  pub store_currency: String,
  pub seed_db: bool,
}

fn parse_var<T>(name: &str, raw: Option<String>, default: T) -> Result<T>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  match raw {
    None => Ok(default),
    Some(value) => value
      .trim()
      .parse::<T>()
      .map_err(|e| AppError::Config(format!("Invalid {} value '{}': {}", name, value, e))),
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok();
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the config from any variable source; `from_env` passes the
  /// process environment.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    let server_host = get("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
    let server_port = parse_var("SERVER_PORT", get("SERVER_PORT"), 8080u16)?;
    let database_url = get("DATABASE_URL");

    let use_mock_gateway = parse_var("USE_MOCK_GATEWAY", get("USE_MOCK_GATEWAY"), false)?;
    let (razorpay_key_id, razorpay_key_secret) = match (get("RAZORPAY_KEY_ID"), get("RAZORPAY_KEY_SECRET")) {
      (Some(id), Some(secret)) => (id, secret),
      _ if use_mock_gateway => ("mock_key_id".to_string(), "mock_key_secret".to_string()),
      _ => {
        return Err(AppError::Config(
          "RAZORPAY_KEY_ID and RAZORPAY_KEY_SECRET are required unless USE_MOCK_GATEWAY=true".to_string(),
        ))
      }
    };
    let razorpay_api_base = get("RAZORPAY_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    let gateway_timeout = Duration::from_secs(parse_var("GATEWAY_TIMEOUT_SECS", get("GATEWAY_TIMEOUT_SECS"), 10u64)?);

    let store_currency = get("STORE_CURRENCY")
      .map(|c| c.trim().to_uppercase())
      .unwrap_or_else(|| "INR".to_string());
    let seed_db = parse_var("SEED_DB", get("SEED_DB"), false)?;

    tracing::info!(
      %server_host,
      server_port,
      persistent = database_url.is_some(),
      use_mock_gateway,
      "Application configuration loaded successfully."
    );

    Ok(Self {
      server_host,
      server_port,
      database_url,
      razorpay_key_id,
      razorpay_key_secret,
      razorpay_api_base,
      gateway_timeout,
      use_mock_gateway,
      store_currency,
      seed_db,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig> {
    let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    AppConfig::from_lookup(|name| vars.get(name).cloned())
  }

  #[test]
  fn defaults_apply_with_mock_gateway() {
    let config = config_from(&[("USE_MOCK_GATEWAY", "true")]).unwrap();
    assert_eq!(config.server_host, "127.0.0.1");
    assert_eq!(config.server_port, 8080);
    assert_eq!(config.database_url, None);
    assert_eq!(config.razorpay_api_base, "https://api.razorpay.com");
    assert_eq!(config.gateway_timeout, Duration::from_secs(10));
    assert_eq!(config.store_currency, "INR");
    assert!(!config.seed_db);
  }

  #[test]
  fn missing_credentials_without_mock_is_a_config_error() {
    assert!(matches!(config_from(&[]), Err(AppError::Config(_))));
  }

  #[test]
  fn invalid_port_is_a_config_error() {
    let err = config_from(&[("USE_MOCK_GATEWAY", "true"), ("SERVER_PORT", "eighty")]).unwrap_err();
    assert!(matches!(err, AppError::Config(ref m) if m.contains("SERVER_PORT")));
  }

  #[test]
  fn explicit_values_override_defaults() {
    let config = config_from(&[
      ("RAZORPAY_KEY_ID", "rzp_test_1"),
      ("RAZORPAY_KEY_SECRET", "s3cret"),
      ("SERVER_PORT", "9000"),
      ("DATABASE_URL", "postgres://localhost/shop"),
      ("GATEWAY_TIMEOUT_SECS", "3"),
      ("STORE_CURRENCY", "usd"),
      ("SEED_DB", "true"),
    ])
    .unwrap();
    assert_eq!(config.server_port, 9000);
    assert_eq!(config.razorpay_key_id, "rzp_test_1");
    assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/shop"));
    assert_eq!(config.gateway_timeout, Duration::from_secs(3));
    assert_eq!(config.store_currency, "USD");
    assert!(config.seed_db);
    assert!(!config.use_mock_gateway);
  }
}
