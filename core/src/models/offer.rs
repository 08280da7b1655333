// glowcart/src/models/offer.rs

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::{Category, Product};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferType {
  Percentage,
  /// Buy one, get one.
  Bogo,
  /// Free or discounted shipping.
  Shipping,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
  pub id: String,
  pub title: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  pub discount: u32,
  #[serde(rename = "type")]
  pub offer_type: OfferType,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub category: Option<Category>,
  pub start_date: NaiveDate,
  pub end_date: NaiveDate,
  pub is_active: bool,
  #[serde(default)]
  pub featured: bool,
  #[serde(default)]
  pub product_ids: Vec<String>,
}

impl Offer {
  /// Active and `start_date <= date <= end_date`.
  pub fn is_live_on(&self, date: NaiveDate) -> bool {
    self.is_active && self.start_date <= date && date <= self.end_date
  }

  /// An offer naming products applies to those; otherwise one naming a
  /// category applies to that category; otherwise it is store-wide.
  pub fn applies_to(&self, product: &Product) -> bool {
    if !self.product_ids.is_empty() {
      return self.product_ids.iter().any(|id| *id == product.id);
    }
    match self.category {
      Some(category) => category == product.category,
      None => true,
    }
  }

  /// The price after this offer, for percentage offers only.
  pub fn discounted_price(&self, price: Decimal) -> Option<Decimal> {
    if self.offer_type != OfferType::Percentage {
      return None;
    }
    let factor = Decimal::ONE_HUNDRED - Decimal::from(self.discount.min(100));
    Some((price * factor / Decimal::ONE_HUNDRED).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
  }
}
