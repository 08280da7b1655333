// glowcart/src/managers/orders.rs

use chrono::Utc;
use tracing::{event, instrument, Level};

use crate::context::ShopContext;
use crate::error::{PreconditionFailure, ShopError, ShopResult};
use crate::events::ShopEvent;
use crate::models::{Order, OrderStatus, Product};
use crate::notify::Severity;
use crate::store::Collection;

#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
  pub status: Option<OrderStatus>,
  pub user_id: Option<String>,
  /// Matched against the order id, customer name and email.
  pub search: Option<String>,
}

impl OrderFilter {
  pub fn matches(&self, order: &Order) -> bool {
    if self.status.is_some_and(|s| s != order.status) {
      return false;
    }
    if self.user_id.as_deref().is_some_and(|id| id != order.user_id) {
      return false;
    }
    match self.search.as_deref().map(str::trim) {
      Some(needle) if !needle.is_empty() => {
        let needle = needle.to_lowercase();
        order.id.to_lowercase().contains(&needle)
          || order.customer.name.to_lowercase().contains(&needle)
          || order.customer.email.to_lowercase().contains(&needle)
      }
      _ => true,
    }
  }
}

#[derive(Clone)]
pub struct OrderManager {
  ctx: ShopContext,
}

impl OrderManager {
  pub fn new(ctx: ShopContext) -> Self {
    Self { ctx }
  }

  /// Orders matching `filter`, newest first.
  pub fn list(&self, filter: &OrderFilter) -> Vec<Order> {
    let mut orders: Vec<Order> = self
      .ctx
      .storage
      .load_or_empty::<Order>(Collection::Orders)
      .into_iter()
      .filter(|o| filter.matches(o))
      .collect();
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
    orders
  }

  pub fn for_user(&self, user_id: &str) -> Vec<Order> {
    self.list(&OrderFilter {
      user_id: Some(user_id.to_string()),
      ..OrderFilter::default()
    })
  }

  pub fn get(&self, order_id: &str) -> ShopResult<Order> {
    self
      .ctx
      .storage
      .load_or_empty::<Order>(Collection::Orders)
      .into_iter()
      .find(|o| o.id == order_id)
      .ok_or_else(|| ShopError::not_found("Order", order_id))
  }

  /// Moves an order along the status state machine. Cancelling puts the
  /// ordered quantities back on the shelf, in the same store batch as the
  /// order itself.
  #[instrument(name = "OrderManager::transition", skip(self))]
  pub fn transition(&self, order_id: &str, next: OrderStatus) -> ShopResult<Order> {
    let result = self.transition_inner(order_id, next);
    self.ctx.reported(result)
  }

  fn transition_inner(&self, order_id: &str, next: OrderStatus) -> ShopResult<Order> {
    let mut orders: Vec<Order> = self.ctx.storage.load(Collection::Orders)?;
    let order = orders
      .iter_mut()
      .find(|o| o.id == order_id)
      .ok_or_else(|| ShopError::not_found("Order", order_id))?;
    let from = order.status;
    order.apply_transition(next, Utc::now())?;
    let updated = order.clone();

    let mut batch = self.ctx.storage.batch();
    batch.put(Collection::Orders, &orders)?;
    let mut restocked = Vec::new();
    if next == OrderStatus::Cancelled {
      let mut products: Vec<Product> = self.ctx.storage.load(Collection::Products)?;
      for line in &updated.items {
        if let Some(product) = products.iter_mut().find(|p| p.id == line.product_id()) {
          product.stock = product.stock.saturating_add(line.quantity);
          product.normalize();
          restocked.push(product.id.clone());
        }
      }
      if !restocked.is_empty() {
        batch.put(Collection::Products, &products)?;
      }
    }
    batch.commit()?;

    event!(Level::INFO, order_id, %from, to = %next, "Order status changed.");
    for product_id in restocked {
      self.ctx.publish(ShopEvent::CatalogChanged { product_id });
    }
    self.ctx.publish(ShopEvent::OrderStatusChanged {
      order_id: updated.id.clone(),
      from,
      to: next,
    });
    self
      .ctx
      .notify(&format!("Order {} is now {}", updated.id, next), Severity::Info);
    Ok(updated)
  }

  pub fn cancel(&self, order_id: &str) -> ShopResult<Order> {
    self.transition(order_id, OrderStatus::Cancelled)
  }

  /// Lets the signed-in customer cancel one of their own orders.
  pub fn cancel_own(&self, order_id: &str) -> ShopResult<Order> {
    let owned = self.ctx.require_user().and_then(|user| {
      let order = self.get(order_id)?;
      if order.user_id != user.id {
        return Err(ShopError::Precondition(PreconditionFailure::Forbidden));
      }
      Ok(order)
    });
    self.ctx.reported(owned)?;
    self.cancel(order_id)
  }
}
