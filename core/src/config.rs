// storefront_cart/src/config.rs

use crate::error::SetupError;
use crate::session::RouteTable;
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_TOKEN_PATH: &str = ".storefront/session.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct StoreConfig {
  pub api_base_url: String,
  pub token_path: PathBuf,
  pub request_timeout: Duration,
  pub routes: RouteTable,
}

impl StoreConfig {
  pub fn new(api_base_url: impl Into<String>) -> Self {
    Self {
      api_base_url: api_base_url.into(),
      token_path: PathBuf::from(DEFAULT_TOKEN_PATH),
      request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
      routes: RouteTable::default(),
    }
  }

  pub fn from_env() -> Result<Self, SetupError> {
    dotenv().ok(); // Load .env file if present
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the config from any variable source; `from_env` passes the process environment.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SetupError> {
    let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let api_base_url = get("STOREFRONT_API_BASE_URL")
      .ok_or_else(|| SetupError::Config("Missing environment variable 'STOREFRONT_API_BASE_URL'".to_string()))?;

    let token_path = get("STOREFRONT_TOKEN_PATH")
      .map(PathBuf::from)
      .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKEN_PATH));

    let timeout_secs = match get("STOREFRONT_REQUEST_TIMEOUT_SECS") {
      Some(raw) => raw
        .parse::<u64>()
        .ok()
        .filter(|secs| *secs > 0)
        .ok_or_else(|| SetupError::Config(format!("Invalid STOREFRONT_REQUEST_TIMEOUT_SECS: '{}'", raw)))?,
      None => DEFAULT_TIMEOUT_SECS,
    };

    let defaults = RouteTable::default();
    let routes = RouteTable {
      login: get("STOREFRONT_LOGIN_ROUTE").unwrap_or(defaults.login),
      checkout: get("STOREFRONT_CHECKOUT_ROUTE").unwrap_or(defaults.checkout),
    };

    tracing::info!(api_base_url = %api_base_url, "Storefront cart configuration loaded.");

    Ok(Self {
      api_base_url,
      token_path,
      request_timeout: Duration::from_secs(timeout_secs),
      routes,
    })
  }
}
