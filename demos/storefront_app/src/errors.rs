// storefront_app/src/errors.rs

use glowcart::{ShopError, StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Shop Error: {0}")]
  Shop(#[from] ShopError),

  #[error("Store Error: {0}")]
  Store(#[from] StoreError),

  #[error("Seed Data Error: {0}")]
  Seed(#[from] serde_json::Error),

  #[error("Internal Error: {0}")]
  Internal(String),
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
