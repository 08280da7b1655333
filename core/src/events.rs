// glowcart/src/events.rs

//! Mutation events. The render layer and outbound integrations subscribe to
//! these instead of being called by the managers directly.

use std::sync::Arc;

use parking_lot::RwLock;
use rust_decimal::Decimal;
use tracing::{event, Level};

use crate::models::{Order, OrderStatus};

#[derive(Debug, Clone, PartialEq)]
pub enum ShopEvent {
  CartChanged { line_count: usize, total: Decimal },
  WishlistChanged { product_ids: Vec<String> },
  CatalogChanged { product_id: String },
  /// Emitted once a checkout has been committed to the store.
  OrderPlaced(Order),
  OrderStatusChanged {
    order_id: String,
    from: OrderStatus,
    to: OrderStatus,
  },
  OffersChanged,
  TipsChanged,
  ProfileChanged { user_id: String },
  SessionChanged { user_id: Option<String> },
}

impl ShopEvent {
  pub fn name(&self) -> &'static str {
    match self {
      ShopEvent::CartChanged { .. } => "cart_changed",
      ShopEvent::WishlistChanged { .. } => "wishlist_changed",
      ShopEvent::CatalogChanged { .. } => "catalog_changed",
      ShopEvent::OrderPlaced(_) => "order_placed",
      ShopEvent::OrderStatusChanged { .. } => "order_status_changed",
      ShopEvent::OffersChanged => "offers_changed",
      ShopEvent::TipsChanged => "tips_changed",
      ShopEvent::ProfileChanged { .. } => "profile_changed",
      ShopEvent::SessionChanged { .. } => "session_changed",
    }
  }
}

pub trait EventListener: Send + Sync {
  fn on_event(&self, event: &ShopEvent);
}

impl<F> EventListener for F
where
  F: Fn(&ShopEvent) + Send + Sync,
{
  fn on_event(&self, event: &ShopEvent) {
    self(event)
  }
}

/// Fan-out of `ShopEvent`s to subscribers, in subscription order.
#[derive(Clone, Default)]
pub struct EventBus {
  listeners: Arc<RwLock<Vec<Arc<dyn EventListener>>>>,
}

impl EventBus {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn subscribe(&self, listener: Arc<dyn EventListener>) {
    self.listeners.write().push(listener);
  }

  pub fn listener_count(&self) -> usize {
    self.listeners.read().len()
  }

  pub fn publish(&self, shop_event: ShopEvent) {
    // Snapshot so a listener may subscribe others without deadlocking.
    let listeners: Vec<Arc<dyn EventListener>> = self.listeners.read().clone();
    event!(Level::DEBUG, event = shop_event.name(), listeners = listeners.len(), "Publishing shop event.");
    for listener in listeners {
      listener.on_event(&shop_event);
    }
  }
}
