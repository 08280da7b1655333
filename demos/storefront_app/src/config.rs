// storefront_app/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use glowcart::{HandoffSettings, ShopSettings};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub store_path: PathBuf,
  pub shop_name: String,
  pub currency: String,
  pub messaging_base_url: String,
  pub messaging_phone: String,
  pub low_stock_threshold: u32,
  pub seed_catalog: bool,
  pub store_quota_bytes: Option<usize>,
}

fn parse_var<T>(var_name: &str, raw: &str) -> Result<T>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  raw
    .trim()
    .parse::<T>()
    .map_err(|e| AppError::Config(format!("Invalid {} value '{}': {}", var_name, raw, e)))
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let store_path = PathBuf::from(get_env("STORE_PATH").unwrap_or_else(|_| "storefront-data.json".to_string()));
    let shop_name = get_env("SHOP_NAME").unwrap_or_else(|_| "Glow Beauty".to_string());
    let currency = get_env("SHOP_CURRENCY").unwrap_or_else(|_| "MAD".to_string());
    let messaging_base_url = get_env("ORDER_MESSAGING_BASE_URL").unwrap_or_else(|_| "https://wa.me".to_string());
    let messaging_phone = get_env("ORDER_MESSAGING_PHONE")?;
    if !messaging_phone.chars().any(|c| c.is_ascii_digit()) {
      return Err(AppError::Config(format!(
        "ORDER_MESSAGING_PHONE '{}' contains no digits",
        messaging_phone
      )));
    }

    let low_stock_threshold = parse_var("LOW_STOCK_THRESHOLD", &get_env("LOW_STOCK_THRESHOLD").unwrap_or_else(|_| "5".to_string()))?;
    let seed_catalog = parse_var("SEED_CATALOG", &get_env("SEED_CATALOG").unwrap_or_else(|_| "true".to_string()))?;
    let store_quota_bytes = match get_env("STORE_QUOTA_BYTES") {
      Ok(raw) => Some(parse_var("STORE_QUOTA_BYTES", &raw)?),
      Err(_) => None,
    };

    tracing::info!(store_path = %store_path.display(), %currency, seed_catalog, "Application configuration loaded successfully.");

    Ok(Self {
      store_path,
      shop_name,
      currency,
      messaging_base_url,
      messaging_phone,
      low_stock_threshold,
      seed_catalog,
      store_quota_bytes,
    })
  }

  pub fn shop_settings(&self) -> ShopSettings {
    ShopSettings {
      shop_name: self.shop_name.clone(),
      currency: self.currency.clone(),
      low_stock_threshold: self.low_stock_threshold,
    }
  }

  pub fn handoff_settings(&self) -> HandoffSettings {
    HandoffSettings {
      base_url: self.messaging_base_url.clone(),
      phone: self.messaging_phone.clone(),
      currency: self.currency.clone(),
      shop_name: self.shop_name.clone(),
    }
  }
}
