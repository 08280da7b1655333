// glowcart/src/models/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::ShopError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
  Hair,
  Face,
  Lips,
  Body,
  Perfumes,
}

impl Category {
  pub const ALL: [Category; 5] = [
    Category::Hair,
    Category::Face,
    Category::Lips,
    Category::Body,
    Category::Perfumes,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Category::Hair => "hair",
      Category::Face => "face",
      Category::Lips => "lips",
      Category::Body => "body",
      Category::Perfumes => "perfumes",
    }
  }
}

impl fmt::Display for Category {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Category {
  type Err = ShopError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Category::ALL
      .into_iter()
      .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
      .ok_or_else(|| ShopError::validation(format!("Unknown product category '{}'", s)))
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ProductStatus {
  #[default]
  InStock,
  OutOfStock,
  OnSale,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
  pub id: String,
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  pub category: Category,
  pub price: Decimal,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub original_price: Option<Decimal>,
  /// Percentage off `original_price`, kept in step with the prices by `normalize`.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub discount: Option<u32>,
  pub stock: u32,
  #[serde(default)]
  pub status: ProductStatus,
  #[serde(default)]
  pub featured: bool,
  #[serde(default)]
  pub rating: f32,
  #[serde(default)]
  pub review_count: u32,
  #[serde(default)]
  pub tags: BTreeSet<String>,
  pub sku: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub image: Option<String>,
  pub created_at: DateTime<Utc>,
}

impl Product {
  /// `round((original_price - price) / original_price * 100)`, rounding halves up.
  /// `None` when there is no original price above the current one.
  pub fn discount_percent(&self) -> Option<u32> {
    let original = self.original_price?;
    if original <= Decimal::ZERO || original <= self.price {
      return None;
    }
    ((original - self.price) / original * Decimal::ONE_HUNDRED)
      .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
      .to_u32()
  }

  /// Per-unit saving against the original price.
  pub fn savings(&self) -> Option<Decimal> {
    self
      .original_price
      .filter(|original| *original > self.price)
      .map(|original| original - self.price)
  }

  pub fn derived_status(&self) -> ProductStatus {
    if self.stock == 0 {
      ProductStatus::OutOfStock
    } else if self.discount_percent().is_some() {
      ProductStatus::OnSale
    } else {
      ProductStatus::InStock
    }
  }

  /// Recomputes `discount` and `status` from prices and stock.
  pub fn normalize(&mut self) {
    self.discount = self.discount_percent();
    self.status = self.derived_status();
  }

  pub fn is_available(&self) -> bool {
    self.stock > 0 && self.status != ProductStatus::OutOfStock
  }

  pub fn is_on_sale(&self) -> bool {
    self.discount_percent().is_some()
  }

  pub fn has_tag(&self, tag: &str) -> bool {
    self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
  }
}
