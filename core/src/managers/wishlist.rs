// glowcart/src/managers/wishlist.rs

use crate::context::ShopContext;
use crate::error::{ShopError, ShopResult};
use crate::events::ShopEvent;
use crate::managers::cart::CartManager;
use crate::models::{CartItem, Product};
use crate::notify::Severity;
use crate::store::Collection;

/// Saved product ids, in the order they were added.
#[derive(Clone)]
pub struct WishlistManager {
  ctx: ShopContext,
}

impl WishlistManager {
  pub fn new(ctx: ShopContext) -> Self {
    Self { ctx }
  }

  pub fn ids(&self) -> Vec<String> {
    self.ctx.storage.load_or_empty(Collection::Wishlist)
  }

  fn stored_ids(&self) -> ShopResult<Vec<String>> {
    Ok(self.ctx.storage.load(Collection::Wishlist)?)
  }

  pub fn contains(&self, product_id: &str) -> bool {
    self.ids().iter().any(|id| id == product_id)
  }

  /// Wishlisted products still in the catalog. Ids whose product has been
  /// deleted are skipped, not pruned.
  pub fn products(&self) -> Vec<Product> {
    let catalog: Vec<Product> = self.ctx.storage.load_or_empty(Collection::Products);
    self
      .ids()
      .iter()
      .filter_map(|id| catalog.iter().find(|p| p.id == *id).cloned())
      .collect()
  }

  fn persist(&self, ids: Vec<String>) -> ShopResult<()> {
    self.ctx.storage.save(Collection::Wishlist, &ids)?;
    self.ctx.publish(ShopEvent::WishlistChanged { product_ids: ids });
    Ok(())
  }

  /// Adds the product if absent, removes it if present. Returns whether it
  /// is wishlisted afterwards.
  pub fn toggle(&self, product_id: &str) -> ShopResult<bool> {
    let result = self.toggle_inner(product_id);
    self.ctx.reported(result)
  }

  fn toggle_inner(&self, product_id: &str) -> ShopResult<bool> {
    let mut ids = self.stored_ids()?;
    if let Some(idx) = ids.iter().position(|id| id == product_id) {
      ids.remove(idx);
      self.persist(ids)?;
      self.ctx.notify("Removed from wishlist", Severity::Info);
      return Ok(false);
    }
    let catalog: Vec<Product> = self.ctx.storage.load_or_empty(Collection::Products);
    if !catalog.iter().any(|p| p.id == product_id) {
      return Err(ShopError::not_found("Product", product_id));
    }
    ids.push(product_id.to_string());
    self.persist(ids)?;
    self.ctx.notify("Added to wishlist", Severity::Success);
    Ok(true)
  }

  /// Adds one unit to the cart and drops the product from the wishlist. The
  /// wishlist is left alone if the cart refuses the product.
  pub fn move_to_cart(&self, product_id: &str) -> ShopResult<CartItem> {
    let ids = self.ctx.reported(self.stored_ids())?;
    let line = CartManager::new(self.ctx.clone()).add_to_cart(product_id, 1)?;
    let remaining: Vec<String> = ids.into_iter().filter(|id| id != product_id).collect();
    self.ctx.reported(self.persist(remaining))?;
    Ok(line)
  }

  pub fn clear(&self) -> ShopResult<()> {
    self.ctx.reported(self.persist(Vec::new()))
  }
}
