// glowcart/src/managers/checkout.rs

//! Checkout as a step pipeline.
//!
//! Steps 1-5 only read until `commit_order`, which writes the new order,
//! the decremented stock and the emptied cart in a single store batch. A
//! failure anywhere before or during that batch leaves every collection as it
//! was. `announce_order` runs after the commit and is optional.

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{event, instrument, Level};

use crate::context::ShopContext;
use crate::error::{PipelineError, PreconditionFailure, ShopError, ShopResult};
use crate::events::ShopEvent;
use crate::managers::cart::{discount_of, total_of};
use crate::models::{new_id, CartItem, Order, OrderStatus, Product, StatusChange, User};
use crate::notify::Severity;
use crate::pipeline::{Pipeline, PipelineControl, PipelineResult};
use crate::store::Collection;

pub const STEP_REQUIRE_NON_EMPTY_CART: &str = "require_non_empty_cart";
pub const STEP_REQUIRE_SESSION: &str = "require_session";
pub const STEP_VERIFY_STOCK: &str = "verify_stock";
pub const STEP_BUILD_ORDER: &str = "build_order";
pub const STEP_COMMIT_ORDER: &str = "commit_order";
pub const STEP_ANNOUNCE_ORDER: &str = "announce_order";

/// Data threaded through the checkout pipeline.
#[derive(Debug, Clone, Default)]
pub struct CheckoutData {
  pub lines: Vec<CartItem>,
  pub notes: Option<String>,
  pub user: Option<User>,
  /// Live catalog with stock already decremented for this order.
  pub products: Vec<Product>,
  pub order: Option<Order>,
  pub committed: bool,
}

pub struct CheckoutService {
  ctx: ShopContext,
  pipeline: Pipeline<CheckoutData, ShopError>,
}

impl CheckoutService {
  pub fn new(ctx: ShopContext) -> ShopResult<Self> {
    let pipeline = build_pipeline(&ctx)?;
    Ok(Self { ctx, pipeline })
  }

  /// The underlying pipeline, for slotting extra steps or hooks in.
  pub fn pipeline_mut(&mut self) -> &mut Pipeline<CheckoutData, ShopError> {
    &mut self.pipeline
  }

  pub fn checkout(&self) -> ShopResult<Order> {
    self.checkout_with_notes(None)
  }

  #[instrument(name = "CheckoutService::checkout", skip_all)]
  pub fn checkout_with_notes(&self, notes: Option<String>) -> ShopResult<Order> {
    let result = self.run_checkout(notes);
    self.ctx.reported(result)
  }

  fn run_checkout(&self, notes: Option<String>) -> ShopResult<Order> {
    let mut data = CheckoutData {
      lines: self.ctx.storage.load(Collection::Cart)?,
      notes,
      ..CheckoutData::default()
    };
    let outcome = self.pipeline.run(&mut data);
    match (outcome, data.order) {
      (Ok(_), Some(order)) if data.committed => Ok(order),
      // Once committed the order stands; later handlers cannot undo it.
      (Err(e), Some(order)) if data.committed => {
        event!(Level::WARN, order_id = %order.id, error = %e, "Checkout handler failed after the order was committed.");
        Ok(order)
      }
      (Err(e), _) => Err(e),
      (Ok(PipelineResult::Stopped), _) => Err(ShopError::validation("Checkout was halted before the order was placed")),
      (Ok(PipelineResult::Completed), _) => Err(ShopError::validation("Checkout finished without placing an order")),
    }
  }
}

fn build_pipeline(ctx: &ShopContext) -> Result<Pipeline<CheckoutData, ShopError>, PipelineError> {
  let mut p = Pipeline::<CheckoutData, ShopError>::new(&[
    (STEP_REQUIRE_NON_EMPTY_CART, false, None),
    (STEP_REQUIRE_SESSION, false, None),
    (STEP_VERIFY_STOCK, false, None),
    (STEP_BUILD_ORDER, false, None),
    (STEP_COMMIT_ORDER, false, None),
    (STEP_ANNOUNCE_ORDER, true, None),
  ]);

  p.on_root(STEP_REQUIRE_NON_EMPTY_CART, |data: &mut CheckoutData| -> ShopResult<PipelineControl> {
    if data.lines.is_empty() {
      return Err(ShopError::Precondition(PreconditionFailure::EmptyCart));
    }
    Ok(PipelineControl::Continue)
  })?;

  let session_ctx = ctx.clone();
  p.on_root(STEP_REQUIRE_SESSION, move |data: &mut CheckoutData| -> ShopResult<PipelineControl> {
    data.user = Some(session_ctx.require_user()?);
    Ok(PipelineControl::Continue)
  })?;

  let stock_ctx = ctx.clone();
  p.on_root(STEP_VERIFY_STOCK, move |data: &mut CheckoutData| -> ShopResult<PipelineControl> {
    // Strict read: this collection is rewritten on commit.
    let mut products: Vec<Product> = stock_ctx.storage.load(Collection::Products)?;
    for line in &data.lines {
      let available = products
        .iter()
        .find(|p| p.id == line.product_id())
        .map(|p| p.stock)
        .unwrap_or(0);
      if available < line.quantity {
        return Err(
          PreconditionFailure::InsufficientStock {
            product_id: line.product_id().to_string(),
            requested: line.quantity,
            available,
          }
          .into(),
        );
      }
    }
    for line in &data.lines {
      if let Some(product) = products.iter_mut().find(|p| p.id == line.product_id()) {
        product.stock -= line.quantity;
        product.normalize();
      }
    }
    data.products = products;
    Ok(PipelineControl::Continue)
  })?;

  p.on_root(STEP_BUILD_ORDER, |data: &mut CheckoutData| -> ShopResult<PipelineControl> {
    let Some(user) = data.user.as_ref() else {
      return Err(ShopError::Precondition(PreconditionFailure::Unauthenticated));
    };
    let now = Utc::now();
    let items = data.lines.clone();
    let total = total_of(&items);
    data.order = Some(Order {
      id: new_id("ord"),
      user_id: user.id.clone(),
      subtotal: total,
      total,
      discount: discount_of(&items),
      items,
      customer: user.snapshot(),
      shipping_address: user.default_address().cloned(),
      status: OrderStatus::Pending,
      status_history: vec![StatusChange {
        status: OrderStatus::Pending,
        at: now,
      }],
      notes: data.notes.clone(),
      created_at: now,
      updated_at: now,
    });
    Ok(PipelineControl::Continue)
  })?;

  let commit_ctx = ctx.clone();
  p.on_root(STEP_COMMIT_ORDER, move |data: &mut CheckoutData| -> ShopResult<PipelineControl> {
    let Some(order) = data.order.as_ref() else {
      return Err(ShopError::validation("No order was built"));
    };
    let mut orders: Vec<Order> = commit_ctx.storage.load(Collection::Orders)?;
    orders.push(order.clone());

    let mut batch = commit_ctx.storage.batch();
    batch.put(Collection::Orders, &orders)?;
    batch.put(Collection::Products, &data.products)?;
    batch.put::<CartItem>(Collection::Cart, &[])?;
    batch.commit()?;

    data.committed = true;
    event!(Level::INFO, order_id = %order.id, total = %order.total, lines = order.items.len(), "Order committed.");
    Ok(PipelineControl::Continue)
  })?;

  let announce_ctx = ctx.clone();
  p.on_root(STEP_ANNOUNCE_ORDER, move |data: &mut CheckoutData| -> ShopResult<PipelineControl> {
    if let Some(order) = data.order.as_ref() {
      announce_ctx.publish(ShopEvent::CartChanged {
        line_count: 0,
        total: Decimal::ZERO,
      });
      for line in &order.items {
        announce_ctx.publish(ShopEvent::CatalogChanged {
          product_id: line.product_id().to_string(),
        });
      }
      announce_ctx.publish(ShopEvent::OrderPlaced(order.clone()));
      announce_ctx.notify(
        &format!("Order {} placed, thank you!", order.id),
        Severity::Success,
      );
    }
    Ok(PipelineControl::Continue)
  })?;

  Ok(p)
}
