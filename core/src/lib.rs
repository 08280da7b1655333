// glowcart/src/lib.rs

//! Glowcart: storefront and admin logic for a beauty retailer.
//!
//! State lives in a key/value `RecordStore`, one JSON collection per key.
//! Collection managers share a `ShopContext` (store, event bus, session,
//! notifier) and every mutation publishes a `ShopEvent`. Checkout runs as a
//! step pipeline whose commit writes order, stock and cart in one batch.

pub mod context;
pub mod error;
pub mod events;
pub mod handoff;
pub mod managers;
pub mod models;
pub mod notify;
pub mod pipeline;
pub mod session;
pub mod store;

pub use crate::context::{ShopContext, ShopSettings};
pub use crate::error::{PipelineError, PreconditionFailure, ShopError, ShopResult, StoreError, StoreResult};
pub use crate::events::{EventBus, EventListener, ShopEvent};
pub use crate::handoff::{deep_link, order_summary, HandoffSettings, LinkSink, MessagingHandoff};
pub use crate::managers::{
  AdminConsole, CartManager, CatalogManager, CheckoutData, CheckoutService, OfferManager, OrderFilter, OrderManager,
  ProductQuery, ProductSort, ProfileManager, TipManager, WishlistManager,
};
pub use crate::notify::{Notifier, Severity, TracingNotifier};
pub use crate::pipeline::{Pipeline, PipelineControl, PipelineResult, StepDef};
pub use crate::session::{Session, SessionProvider};
pub use crate::store::{Collection, FileStore, MemoryStore, RecordStore, Storage};

/// Entry point bundling every manager over one context.
pub struct Shop {
  ctx: ShopContext,
  checkout: CheckoutService,
}

impl Shop {
  pub fn new(ctx: ShopContext) -> ShopResult<Self> {
    let checkout = CheckoutService::new(ctx.clone())?;
    Ok(Self { ctx, checkout })
  }

  /// A shop over an empty in-memory store with default settings.
  pub fn in_memory() -> ShopResult<Self> {
    Self::new(ShopContext::new(Storage::in_memory(), ShopSettings::default()))
  }

  pub fn context(&self) -> &ShopContext {
    &self.ctx
  }

  pub fn events(&self) -> &EventBus {
    &self.ctx.events
  }

  pub fn catalog(&self) -> CatalogManager {
    CatalogManager::new(self.ctx.clone())
  }

  pub fn cart(&self) -> CartManager {
    CartManager::new(self.ctx.clone())
  }

  pub fn checkout(&self) -> &CheckoutService {
    &self.checkout
  }

  pub fn checkout_mut(&mut self) -> &mut CheckoutService {
    &mut self.checkout
  }

  pub fn orders(&self) -> OrderManager {
    OrderManager::new(self.ctx.clone())
  }

  pub fn offers(&self) -> OfferManager {
    OfferManager::new(self.ctx.clone())
  }

  pub fn tips(&self) -> TipManager {
    TipManager::new(self.ctx.clone())
  }

  pub fn profile(&self) -> ProfileManager {
    ProfileManager::new(self.ctx.clone())
  }

  pub fn wishlist(&self) -> WishlistManager {
    WishlistManager::new(self.ctx.clone())
  }

  pub fn admin(&self) -> AdminConsole {
    AdminConsole::new(self.ctx.clone())
  }
}
