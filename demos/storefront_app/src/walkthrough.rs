// storefront_app/src/walkthrough.rs

//! A scripted storefront visit followed by an admin pass over the result.

use crate::errors::{AppError, Result};
use chrono::Utc;
use glowcart::managers::NewUser;
use glowcart::models::{Order, OrderStatus};
use glowcart::{ProductQuery, ProductSort, Shop};
use tracing::{info, instrument, warn};

pub const ADMIN_EMAIL: &str = "admin@glowbeauty.ma";
pub const CUSTOMER_EMAIL: &str = "salma@example.ma";
const DEMO_PASSWORD: &str = "glow-demo-2025";

fn ensure_account(shop: &Shop, name: &str, email: &str, admin: bool) -> Result<()> {
  let profile = shop.profile();
  let input = NewUser {
    name: name.to_string(),
    email: email.to_string(),
    phone: "+212 600 000 000".to_string(),
    password: DEMO_PASSWORD.to_string(),
  };
  if admin {
    if profile.bootstrap_admin(input)?.is_some() {
      info!(email, "Admin account created.");
    }
    return Ok(());
  }
  if !profile.users().iter().any(|u| u.email == email) {
    profile.register(input)?;
  }
  Ok(())
}

/// Customer side: browse, fill the cart and check out.
#[instrument(name = "walkthrough::shop_as_customer", skip_all, err(Display))]
pub fn shop_as_customer(shop: &Shop) -> Result<Option<Order>> {
  ensure_account(shop, "Salma", CUSTOMER_EMAIL, false)?;
  shop.profile().login(CUSTOMER_EMAIL, DEMO_PASSWORD)?;

  let today = Utc::now().date_naive();
  let offers = shop.offers();
  for product in shop.catalog().featured(3) {
    info!(
      product = %product.name,
      price = %product.price,
      best_price = %offers.best_price(&product, today),
      stock = product.stock,
      "Featured."
    );
  }

  let picks = shop.catalog().query(
    &ProductQuery::new()
      .in_stock_only()
      .sort(ProductSort::Rating)
      .limit(2),
  );
  if picks.is_empty() {
    warn!("Nothing in stock, skipping checkout.");
    return Ok(None);
  }
  for (i, product) in picks.iter().enumerate() {
    shop.cart().add_to_cart(&product.id, i as u32 + 1)?;
  }
  if let Some(extra) = shop.catalog().query(&ProductQuery::new().on_sale_only()).first() {
    shop.wishlist().toggle(&extra.id)?;
  }

  let cart = shop.cart();
  info!(
    lines = cart.lines().len(),
    items = cart.item_count(),
    total = %cart.cart_total(),
    saved = %cart.cart_discount(),
    "Cart ready."
  );

  let order = shop
    .checkout()
    .checkout_with_notes(Some("Please call on arrival.".to_string()))?;
  info!(order_id = %order.id, total = %order.total, "Order placed.");
  shop.profile().logout();
  Ok(Some(order))
}

/// Admin side: confirm the new order and print the dashboard.
#[instrument(name = "walkthrough::review_as_admin", skip_all, err(Display))]
pub fn review_as_admin(shop: &Shop, placed: Option<&Order>) -> Result<()> {
  ensure_account(shop, "Glow Admin", ADMIN_EMAIL, true)?;
  shop.profile().login(ADMIN_EMAIL, DEMO_PASSWORD).map_err(|e| {
    AppError::Internal(format!("Admin login failed ({}); was the admin password changed?", e))
  })?;

  let admin = shop.admin();
  if let Some(order) = placed {
    admin.update_order_status(&order.id, OrderStatus::Confirmed)?;
  }

  let stats = admin.dashboard(None)?;
  info!(
    revenue = %stats.revenue,
    orders = stats.order_count,
    pending = stats.pending_orders,
    products = stats.product_count,
    customers = stats.customer_count,
    "Dashboard."
  );
  for (status, count) in &stats.orders_by_status {
    info!(%status, count, "Orders by status.");
  }
  for product in &stats.low_stock {
    warn!(product = %product.name, stock = product.stock, "Low stock.");
  }
  for seller in &stats.top_sellers {
    info!(product = %seller.name, units = seller.units, revenue = %seller.revenue, "Top seller.");
  }
  for customer in admin.customers()? {
    info!(name = %customer.name, orders = customer.order_count, spent = %customer.total_spent, "Customer.");
  }
  shop.profile().logout();
  Ok(())
}

pub fn run(shop: &Shop) -> Result<()> {
  let placed = shop_as_customer(shop)?;
  review_as_admin(shop, placed.as_ref())
}
