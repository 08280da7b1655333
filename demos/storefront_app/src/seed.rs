// storefront_app/src/seed.rs

//! Demo catalog loaded into an empty store on first start.

use crate::errors::Result;
use glowcart::models::{Offer, Product, Tip};
use glowcart::{Collection, Storage};
use serde::Deserialize;
use tracing::instrument;

const SEED_JSON: &str = include_str!("../data/catalog.json");

#[derive(Debug, Deserialize)]
pub struct SeedData {
  pub products: Vec<Product>,
  #[serde(default)]
  pub offers: Vec<Offer>,
  #[serde(default)]
  pub tips: Vec<Tip>,
}

pub fn seed_data() -> Result<SeedData> {
  let mut data: SeedData = serde_json::from_str(SEED_JSON)?;
  data.products.iter_mut().for_each(Product::normalize);
  Ok(data)
}

/// Writes the demo catalog, offers and tips if the store has no products yet.
/// Returns whether anything was written.
#[instrument(name = "seed::seed_if_empty", skip_all, err(Display))]
pub fn seed_if_empty(storage: &Storage) -> Result<bool> {
  let existing: Vec<Product> = storage.load(Collection::Products)?;
  if !existing.is_empty() {
    tracing::debug!(products = existing.len(), "Store already has a catalog, skipping seed.");
    return Ok(false);
  }
  let data = seed_data()?;
  let mut batch = storage.batch();
  batch.put(Collection::Products, &data.products)?;
  batch.put(Collection::Offers, &data.offers)?;
  batch.put(Collection::Tips, &data.tips)?;
  batch.commit()?;
  tracing::info!(
    products = data.products.len(),
    offers = data.offers.len(),
    tips = data.tips.len(),
    "Demo catalog seeded."
  );
  Ok(true)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn bundled_catalog_parses_and_derives_discounts() {
    let data = seed_data().unwrap();
    assert_eq!(data.products.len(), 5);
    let lipstick = data.products.iter().find(|p| p.id == "prd-velvet-lipstick").unwrap();
    assert_eq!(lipstick.discount, Some(15));
    let mask = data.products.iter().find(|p| p.id == "prd-ghassoul-mask").unwrap();
    assert!(!mask.is_available());
  }

  #[test]
  fn seeding_happens_once() {
    let storage = Storage::in_memory();
    assert!(seed_if_empty(&storage).unwrap());
    assert!(!seed_if_empty(&storage).unwrap());
    let offers: Vec<Offer> = storage.load(Collection::Offers).unwrap();
    assert_eq!(offers.len(), 2);
  }
}
