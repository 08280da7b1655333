// glowcart/src/managers/cart.rs

//! Cart lines against the live catalog.
//!
//! A line is a snapshot of the product taken when it was first added. Later
//! catalog edits never reach existing lines: totals are always computed from
//! the snapshot price. Only stock is read live, to cap quantities.

use rust_decimal::Decimal;
use tracing::{event, instrument, Level};

use crate::context::ShopContext;
use crate::error::{PreconditionFailure, ShopError, ShopResult};
use crate::events::ShopEvent;
use crate::models::{CartItem, Product};
use crate::notify::Severity;
use crate::store::Collection;

/// Σ snapshot price × quantity.
pub fn total_of(lines: &[CartItem]) -> Decimal {
  lines.iter().map(CartItem::line_total).sum()
}

/// Σ (original price − price) × quantity over lines with an original price.
pub fn discount_of(lines: &[CartItem]) -> Decimal {
  lines.iter().map(CartItem::line_discount).sum()
}

#[derive(Clone)]
pub struct CartManager {
  ctx: ShopContext,
}

impl CartManager {
  pub fn new(ctx: ShopContext) -> Self {
    Self { ctx }
  }

  pub fn lines(&self) -> Vec<CartItem> {
    self.ctx.storage.load_or_empty(Collection::Cart)
  }

  /// Strict read for paths that rewrite the cart.
  fn stored_lines(&self) -> ShopResult<Vec<CartItem>> {
    Ok(self.ctx.storage.load(Collection::Cart)?)
  }

  pub fn line(&self, product_id: &str) -> Option<CartItem> {
    self.lines().into_iter().find(|l| l.product_id() == product_id)
  }

  pub fn cart_total(&self) -> Decimal {
    total_of(&self.lines())
  }

  pub fn cart_discount(&self) -> Decimal {
    discount_of(&self.lines())
  }

  /// Number of units across all lines.
  pub fn item_count(&self) -> u32 {
    self.lines().iter().map(|l| l.quantity).sum()
  }

  pub fn is_empty(&self) -> bool {
    self.lines().is_empty()
  }

  fn live_product(&self, product_id: &str) -> Option<Product> {
    self
      .ctx
      .storage
      .load_or_empty::<Product>(Collection::Products)
      .into_iter()
      .find(|p| p.id == product_id)
  }

  fn persist(&self, lines: &[CartItem]) -> ShopResult<()> {
    self.ctx.storage.save(Collection::Cart, lines)?;
    self.ctx.publish(ShopEvent::CartChanged {
      line_count: lines.len(),
      total: total_of(lines),
    });
    Ok(())
  }

  /// Adds `quantity` units of a product, merging into its existing line.
  ///
  /// The resulting quantity is capped at the live stock; a product with no
  /// stock cannot be added at all.
  #[instrument(name = "CartManager::add_to_cart", skip(self))]
  pub fn add_to_cart(&self, product_id: &str, quantity: u32) -> ShopResult<CartItem> {
    let result = self.add_inner(product_id, quantity);
    self.ctx.reported(result)
  }

  fn add_inner(&self, product_id: &str, quantity: u32) -> ShopResult<CartItem> {
    if quantity == 0 {
      return Err(ShopError::validation("Quantity must be at least 1"));
    }
    let product = self
      .live_product(product_id)
      .ok_or_else(|| ShopError::not_found("Product", product_id))?;
    if !product.is_available() {
      return Err(
        PreconditionFailure::OutOfStock {
          product_id: product.id.clone(),
        }
        .into(),
      );
    }

    let mut lines = self.stored_lines()?;
    let (line, requested) = match lines.iter_mut().find(|l| l.product_id() == product_id) {
      Some(existing) => {
        let requested = existing.quantity.saturating_add(quantity);
        existing.quantity = requested.min(product.stock);
        (existing.clone(), requested)
      }
      None => {
        let line = CartItem::from_product(&product, quantity.min(product.stock));
        lines.push(line.clone());
        (line, quantity)
      }
    };
    self.persist(&lines)?;

    if line.quantity < requested {
      event!(Level::INFO, product_id, requested, capped = line.quantity, "Cart quantity capped at stock.");
      self.ctx.notify(
        &format!("Only {} of {} available, quantity adjusted", product.stock, product.name),
        Severity::Warning,
      );
    } else {
      self
        .ctx
        .notify(&format!("{} added to cart", product.name), Severity::Success);
    }
    Ok(line)
  }

  /// Overwrites a line's quantity. Zero or less removes the line. Quantities
  /// above the live stock are capped; a line whose product is sold out is
  /// removed. Returns the line as stored, or `None` if it no longer exists.
  #[instrument(name = "CartManager::set_quantity", skip(self))]
  pub fn set_quantity(&self, product_id: &str, new_quantity: i64) -> ShopResult<Option<CartItem>> {
    if new_quantity <= 0 {
      self.remove_from_cart(product_id)?;
      return Ok(None);
    }
    let result = self.set_inner(product_id, new_quantity);
    self.ctx.reported(result)
  }

  fn set_inner(&self, product_id: &str, new_quantity: i64) -> ShopResult<Option<CartItem>> {
    let mut lines = self.stored_lines()?;
    let idx = lines
      .iter()
      .position(|l| l.product_id() == product_id)
      .ok_or_else(|| ShopError::not_found("Cart line", product_id))?;

    let requested = u32::try_from(new_quantity).unwrap_or(u32::MAX);
    let capped = match self.live_product(product_id) {
      Some(product) => requested.min(product.stock),
      // Product left the catalog; the snapshot still stands.
      None => requested,
    };

    if capped == 0 {
      let removed = lines.remove(idx);
      self.persist(&lines)?;
      self.ctx.notify(
        &format!("{} is out of stock and was removed from the cart", removed.product.name),
        Severity::Warning,
      );
      return Ok(None);
    }

    lines[idx].quantity = capped;
    let line = lines[idx].clone();
    self.persist(&lines)?;
    if capped < requested {
      self.ctx.notify(
        &format!("Only {} of {} available, quantity adjusted", capped, line.product.name),
        Severity::Warning,
      );
    }
    Ok(Some(line))
  }

  /// Drops the line for `product_id`. Returns whether a line was removed;
  /// an absent line is not an error.
  #[instrument(name = "CartManager::remove_from_cart", skip(self))]
  pub fn remove_from_cart(&self, product_id: &str) -> ShopResult<bool> {
    let result = self.remove_inner(product_id);
    self.ctx.reported(result)
  }

  fn remove_inner(&self, product_id: &str) -> ShopResult<bool> {
    let mut lines = self.stored_lines()?;
    let before = lines.len();
    lines.retain(|l| l.product_id() != product_id);
    if lines.len() == before {
      return Ok(false);
    }
    self.persist(&lines)?;
    Ok(true)
  }

  pub fn clear(&self) -> ShopResult<()> {
    self.ctx.reported(self.persist(&[]))
  }
}
