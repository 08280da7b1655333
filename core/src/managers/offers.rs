// glowcart/src/managers/offers.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::instrument;

use crate::context::ShopContext;
use crate::error::{ShopError, ShopResult};
use crate::events::ShopEvent;
use crate::models::{new_id, Category, Offer, OfferType, Product};
use crate::notify::Severity;
use crate::store::Collection;

/// Fields for creating or replacing an offer. An `id` of `None` creates one.
#[derive(Debug, Clone)]
pub struct OfferInput {
  pub id: Option<String>,
  pub title: String,
  pub description: Option<String>,
  pub discount: u32,
  pub offer_type: OfferType,
  pub category: Option<Category>,
  pub start_date: NaiveDate,
  pub end_date: NaiveDate,
  pub is_active: bool,
  pub featured: bool,
  pub product_ids: Vec<String>,
}

impl OfferInput {
  fn validate(&self) -> ShopResult<()> {
    if self.title.trim().is_empty() {
      return Err(ShopError::validation("Offer title is required"));
    }
    if self.end_date < self.start_date {
      return Err(ShopError::validation("Offer ends before it starts"));
    }
    if self.offer_type == OfferType::Percentage && !(1..=100).contains(&self.discount) {
      return Err(ShopError::validation("Percentage discount must be between 1 and 100"));
    }
    Ok(())
  }
}

#[derive(Clone)]
pub struct OfferManager {
  ctx: ShopContext,
}

impl OfferManager {
  pub fn new(ctx: ShopContext) -> Self {
    Self { ctx }
  }

  pub fn all(&self) -> Vec<Offer> {
    self.ctx.storage.load_or_empty(Collection::Offers)
  }

  pub fn get(&self, offer_id: &str) -> ShopResult<Offer> {
    self
      .all()
      .into_iter()
      .find(|o| o.id == offer_id)
      .ok_or_else(|| ShopError::not_found("Offer", offer_id))
  }

  /// Offers live on `date`, soonest ending first.
  pub fn active_on(&self, date: NaiveDate) -> Vec<Offer> {
    let mut offers: Vec<Offer> = self.all().into_iter().filter(|o| o.is_live_on(date)).collect();
    offers.sort_by(|a, b| a.end_date.cmp(&b.end_date).then_with(|| a.id.cmp(&b.id)));
    offers
  }

  pub fn featured_on(&self, date: NaiveDate) -> Vec<Offer> {
    self.active_on(date).into_iter().filter(|o| o.featured).collect()
  }

  pub fn for_category(&self, category: Category, date: NaiveDate) -> Vec<Offer> {
    self
      .active_on(date)
      .into_iter()
      .filter(|o| o.category == Some(category))
      .collect()
  }

  pub fn for_product(&self, product: &Product, date: NaiveDate) -> Vec<Offer> {
    self
      .active_on(date)
      .into_iter()
      .filter(|o| o.applies_to(product))
      .collect()
  }

  /// The lowest price any live percentage offer gives `product`, or its own
  /// price when none applies.
  pub fn best_price(&self, product: &Product, date: NaiveDate) -> Decimal {
    self
      .for_product(product, date)
      .iter()
      .filter_map(|o| o.discounted_price(product.price))
      .fold(product.price, Decimal::min)
  }

  #[instrument(name = "OfferManager::save", skip(self, input), fields(title = %input.title))]
  pub fn save(&self, input: OfferInput) -> ShopResult<Offer> {
    let result = self.save_inner(input);
    self.ctx.reported(result)
  }

  fn save_inner(&self, input: OfferInput) -> ShopResult<Offer> {
    self.ctx.require_admin()?;
    input.validate()?;
    let mut offers: Vec<Offer> = self.ctx.storage.load(Collection::Offers)?;
    let offer = Offer {
      id: input.id.clone().unwrap_or_else(|| new_id("off")),
      title: input.title.trim().to_string(),
      description: input.description,
      discount: input.discount,
      offer_type: input.offer_type,
      category: input.category,
      start_date: input.start_date,
      end_date: input.end_date,
      is_active: input.is_active,
      featured: input.featured,
      product_ids: input.product_ids,
    };
    match offers.iter_mut().find(|o| o.id == offer.id) {
      Some(existing) => *existing = offer.clone(),
      None if input.id.is_some() => return Err(ShopError::not_found("Offer", offer.id)),
      None => offers.push(offer.clone()),
    }
    self.ctx.storage.save(Collection::Offers, &offers)?;
    self.ctx.publish(ShopEvent::OffersChanged);
    self.ctx.notify("Offer saved", Severity::Success);
    Ok(offer)
  }

  pub fn set_active(&self, offer_id: &str, is_active: bool) -> ShopResult<Offer> {
    let result = self.ctx.require_admin().and_then(|_| {
      let mut offers: Vec<Offer> = self.ctx.storage.load(Collection::Offers)?;
      let offer = offers
        .iter_mut()
        .find(|o| o.id == offer_id)
        .ok_or_else(|| ShopError::not_found("Offer", offer_id))?;
      offer.is_active = is_active;
      let updated = offer.clone();
      self.ctx.storage.save(Collection::Offers, &offers)?;
      self.ctx.publish(ShopEvent::OffersChanged);
      Ok(updated)
    });
    self.ctx.reported(result)
  }

  pub fn delete(&self, offer_id: &str) -> ShopResult<()> {
    let result = self.ctx.require_admin().and_then(|_| {
      let mut offers: Vec<Offer> = self.ctx.storage.load(Collection::Offers)?;
      let before = offers.len();
      offers.retain(|o| o.id != offer_id);
      if offers.len() == before {
        return Err(ShopError::not_found("Offer", offer_id));
      }
      self.ctx.storage.save(Collection::Offers, &offers)?;
      self.ctx.publish(ShopEvent::OffersChanged);
      Ok(())
    });
    self.ctx.reported(result)
  }
}
