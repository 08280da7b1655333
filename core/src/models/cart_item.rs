// glowcart/src/models/cart_item.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Product;

/// A cart line: a copy of the product as it was when first added, plus the
/// quantity. The copied price is what the line is charged at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
  #[serde(flatten)]
  pub product: Product,
  pub quantity: u32,
  pub added_at: DateTime<Utc>,
}

impl CartItem {
  pub fn from_product(product: &Product, quantity: u32) -> Self {
    Self {
      product: product.clone(),
      quantity,
      added_at: Utc::now(),
    }
  }

  pub fn product_id(&self) -> &str {
    &self.product.id
  }

  pub fn line_total(&self) -> Decimal {
    self.product.price * Decimal::from(self.quantity)
  }

  /// `(original_price - price) * quantity`, zero unless the original price
  /// is above the price.
  pub fn line_discount(&self) -> Decimal {
    self
      .product
      .savings()
      .map(|saving| saving * Decimal::from(self.quantity))
      .unwrap_or(Decimal::ZERO)
  }
}
