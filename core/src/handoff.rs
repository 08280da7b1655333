// glowcart/src/handoff.rs

//! One-way order handoff to a messaging deep link.
//!
//! `MessagingHandoff` listens for `OrderPlaced`, renders a plain-text summary
//! and passes `{base_url}/{phone}?text={summary}` to a `LinkSink`. Nothing is
//! read back.

use std::fmt::Write as _;
use std::sync::Arc;

use tracing::{event, Level};

use crate::events::{EventListener, ShopEvent};
use crate::models::Order;

/// Where a checkout summary is sent.
#[derive(Debug, Clone)]
pub struct HandoffSettings {
  pub base_url: String,
  /// Shop's messaging number. Non-digits are stripped when building the link.
  pub phone: String,
  pub currency: String,
  pub shop_name: String,
}

/// Opens an outbound link: a browser, a log line, a test double.
pub trait LinkSink: Send + Sync {
  fn open(&self, url: &str);
}

impl<F> LinkSink for F
where
  F: Fn(&str) + Send + Sync,
{
  fn open(&self, url: &str) {
    self(url)
  }
}

/// Human-readable summary of `order`, one line per item.
pub fn order_summary(order: &Order, shop_name: &str, currency: &str) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "New order {} from {}", order.id, shop_name);
  let _ = writeln!(out, "Customer: {}", order.customer.name);
  if !order.customer.phone.is_empty() {
    let _ = writeln!(out, "Phone: {}", order.customer.phone);
  }
  if !order.customer.email.is_empty() {
    let _ = writeln!(out, "Email: {}", order.customer.email);
  }
  if let Some(address) = &order.shipping_address {
    let _ = writeln!(out, "Ship to: {}", address.one_line());
  }
  out.push('\n');
  for line in &order.items {
    let _ = writeln!(
      out,
      "- {} x{} @ {:.2} {} = {:.2} {}",
      line.product.name,
      line.quantity,
      line.product.price,
      currency,
      line.line_total(),
      currency
    );
  }
  out.push('\n');
  if !order.discount.is_zero() {
    let _ = writeln!(out, "You save: {:.2} {}", order.discount, currency);
  }
  let _ = write!(out, "Total: {:.2} {}", order.total, currency);
  if let Some(notes) = order.notes.as_deref().filter(|n| !n.trim().is_empty()) {
    let _ = write!(out, "\nNotes: {}", notes.trim());
  }
  out
}

/// `{base}/{digits of phone}?text={url-encoded text}`.
pub fn deep_link(base_url: &str, phone: &str, text: &str) -> String {
  let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
  format!(
    "{}/{}?text={}",
    base_url.trim_end_matches('/'),
    digits,
    urlencoding::encode(text)
  )
}

pub struct MessagingHandoff {
  settings: HandoffSettings,
  sink: Arc<dyn LinkSink>,
}

impl MessagingHandoff {
  pub fn new(settings: HandoffSettings, sink: Arc<dyn LinkSink>) -> Self {
    Self { settings, sink }
  }

  pub fn link_for(&self, order: &Order) -> String {
    let summary = order_summary(order, &self.settings.shop_name, &self.settings.currency);
    deep_link(&self.settings.base_url, &self.settings.phone, &summary)
  }
}

impl EventListener for MessagingHandoff {
  fn on_event(&self, event: &ShopEvent) {
    if let ShopEvent::OrderPlaced(order) = event {
      let url = self.link_for(order);
      event!(Level::INFO, order_id = %order.id, "Handing order off to messaging.");
      self.sink.open(&url);
    }
  }
}
