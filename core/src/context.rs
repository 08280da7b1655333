// glowcart/src/context.rs

//! Shared services injected into every collection manager.

use std::sync::Arc;

use crate::error::{PreconditionFailure, ShopError, ShopResult};
use crate::events::{EventBus, ShopEvent};
use crate::models::User;
use crate::notify::{Notifier, Severity, TracingNotifier};
use crate::session::{Session, SessionProvider};
use crate::store::Storage;

/// Storefront-wide settings.
#[derive(Debug, Clone)]
pub struct ShopSettings {
  pub shop_name: String,
  /// ISO code shown next to amounts in summaries.
  pub currency: String,
  /// Stock level at or below which the admin dashboard flags a product.
  pub low_stock_threshold: u32,
}

impl Default for ShopSettings {
  fn default() -> Self {
    Self {
      shop_name: "Glow Beauty".to_string(),
      currency: "MAD".to_string(),
      low_stock_threshold: 5,
    }
  }
}

#[derive(Clone)]
pub struct ShopContext {
  pub storage: Storage,
  pub events: EventBus,
  pub session: Arc<dyn SessionProvider>,
  pub notifier: Arc<dyn Notifier>,
  pub settings: Arc<ShopSettings>,
}

impl ShopContext {
  pub fn new(storage: Storage, settings: ShopSettings) -> Self {
    Self {
      storage,
      events: EventBus::new(),
      session: Arc::new(Session::new()),
      notifier: Arc::new(TracingNotifier),
      settings: Arc::new(settings),
    }
  }

  pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
    self.notifier = notifier;
    self
  }

  pub fn with_session(mut self, session: Arc<dyn SessionProvider>) -> Self {
    self.session = session;
    self
  }

  pub fn publish(&self, event: ShopEvent) {
    self.events.publish(event);
  }

  pub fn notify(&self, message: &str, severity: Severity) {
    self.notifier.notify(message, severity);
  }

  pub(crate) fn require_user(&self) -> ShopResult<User> {
    self
      .session
      .current_user()
      .ok_or(ShopError::Precondition(PreconditionFailure::Unauthenticated))
  }

  pub(crate) fn require_admin(&self) -> ShopResult<User> {
    let user = self.require_user()?;
    if !user.is_admin() {
      return Err(PreconditionFailure::Forbidden.into());
    }
    Ok(user)
  }

  /// Surfaces a failed operation as a notification and passes the result on.
  pub(crate) fn reported<T>(&self, result: ShopResult<T>) -> ShopResult<T> {
    if let Err(e) = &result {
      let severity = match e {
        ShopError::Precondition(_) | ShopError::NotFound { .. } => Severity::Warning,
        _ => Severity::Error,
      };
      self.notify(&e.to_string(), severity);
    }
    result
  }
}
