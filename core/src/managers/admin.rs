// glowcart/src/managers/admin.rs

//! Back-office operations. Every mutation requires an admin session.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{event, instrument, Level};

use crate::context::ShopContext;
use crate::error::{ShopError, ShopResult};
use crate::events::ShopEvent;
use crate::managers::orders::{OrderFilter, OrderManager};
use crate::models::{new_id, Category, Order, OrderStatus, Product, ProductStatus, Role, User};
use crate::notify::Severity;
use crate::store::Collection;

/// Editable product fields. An `id` of `None` creates a product. Rating,
/// review count and creation time are kept from the stored record on update.
#[derive(Debug, Clone)]
pub struct ProductInput {
  pub id: Option<String>,
  pub name: String,
  pub description: Option<String>,
  pub category: Category,
  pub price: Decimal,
  pub original_price: Option<Decimal>,
  pub stock: u32,
  pub featured: bool,
  pub tags: BTreeSet<String>,
  pub sku: String,
  pub image: Option<String>,
}

impl ProductInput {
  fn validate(&self) -> ShopResult<()> {
    if self.name.trim().is_empty() {
      return Err(ShopError::validation("Product name is required"));
    }
    if self.price <= Decimal::ZERO {
      return Err(ShopError::validation("Price must be greater than zero"));
    }
    if self.original_price.is_some_and(|original| original <= self.price) {
      return Err(ShopError::validation("Original price must be above the selling price"));
    }
    Ok(())
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomerSummary {
  pub user_id: String,
  pub name: String,
  pub email: String,
  pub phone: String,
  pub order_count: usize,
  /// Over orders that were not cancelled.
  pub total_spent: Decimal,
  pub last_order_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopSeller {
  pub product_id: String,
  pub name: String,
  pub units: u32,
  pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
  /// Σ order total over orders that were not cancelled.
  pub revenue: Decimal,
  pub order_count: usize,
  /// One entry per status, in state-machine order.
  pub orders_by_status: Vec<(OrderStatus, usize)>,
  pub pending_orders: usize,
  pub product_count: usize,
  /// Products at or below the threshold, lowest stock first.
  pub low_stock: Vec<Product>,
  pub customer_count: usize,
  /// By units sold, most first.
  pub top_sellers: Vec<TopSeller>,
}

const TOP_SELLER_COUNT: usize = 5;

#[derive(Clone)]
pub struct AdminConsole {
  ctx: ShopContext,
}

impl AdminConsole {
  pub fn new(ctx: ShopContext) -> Self {
    Self { ctx }
  }

  fn orders_manager(&self) -> OrderManager {
    OrderManager::new(self.ctx.clone())
  }

  #[instrument(name = "AdminConsole::save_product", skip(self, input), fields(name = %input.name))]
  pub fn save_product(&self, input: ProductInput) -> ShopResult<Product> {
    let result = self.save_product_inner(input);
    self.ctx.reported(result)
  }

  fn save_product_inner(&self, input: ProductInput) -> ShopResult<Product> {
    self.ctx.require_admin()?;
    input.validate()?;
    let mut products: Vec<Product> = self.ctx.storage.load(Collection::Products)?;
    let existing = input
      .id
      .as_deref()
      .map(|id| {
        products
          .iter()
          .position(|p| p.id == id)
          .ok_or_else(|| ShopError::not_found("Product", id))
      })
      .transpose()?;

    let (rating, review_count, created_at) = match existing {
      Some(idx) => (products[idx].rating, products[idx].review_count, products[idx].created_at),
      None => (0.0, 0, Utc::now()),
    };
    let id = input.id.unwrap_or_else(|| new_id("prd"));
    let sku = if input.sku.trim().is_empty() {
      id.to_uppercase()
    } else {
      input.sku.trim().to_string()
    };
    let mut product = Product {
      id,
      name: input.name.trim().to_string(),
      description: input.description,
      category: input.category,
      price: input.price,
      original_price: input.original_price,
      discount: None,
      stock: input.stock,
      status: ProductStatus::default(),
      featured: input.featured,
      rating,
      review_count,
      tags: input.tags,
      sku,
      image: input.image,
      created_at,
    };
    product.normalize();

    match existing {
      Some(idx) => products[idx] = product.clone(),
      None => products.push(product.clone()),
    }
    self.ctx.storage.save(Collection::Products, &products)?;
    event!(Level::INFO, product_id = %product.id, created = existing.is_none(), "Product saved.");
    self.ctx.publish(ShopEvent::CatalogChanged {
      product_id: product.id.clone(),
    });
    self
      .ctx
      .notify(&format!("{} saved", product.name), Severity::Success);
    Ok(product)
  }

  pub fn set_stock(&self, product_id: &str, stock: u32) -> ShopResult<Product> {
    let result = self.ctx.require_admin().and_then(|_| {
      let mut products: Vec<Product> = self.ctx.storage.load(Collection::Products)?;
      let product = products
        .iter_mut()
        .find(|p| p.id == product_id)
        .ok_or_else(|| ShopError::not_found("Product", product_id))?;
      product.stock = stock;
      product.normalize();
      let updated = product.clone();
      self.ctx.storage.save(Collection::Products, &products)?;
      self.ctx.publish(ShopEvent::CatalogChanged {
        product_id: updated.id.clone(),
      });
      Ok(updated)
    });
    self.ctx.reported(result)
  }

  /// Removes a product from the catalog. Carts, wishlists and orders keep
  /// their own copies.
  pub fn delete_product(&self, product_id: &str) -> ShopResult<()> {
    let result = self.ctx.require_admin().and_then(|_| {
      let mut products: Vec<Product> = self.ctx.storage.load(Collection::Products)?;
      let before = products.len();
      products.retain(|p| p.id != product_id);
      if products.len() == before {
        return Err(ShopError::not_found("Product", product_id));
      }
      self.ctx.storage.save(Collection::Products, &products)?;
      self.ctx.publish(ShopEvent::CatalogChanged {
        product_id: product_id.to_string(),
      });
      Ok(())
    });
    self.ctx.reported(result)
  }

  pub fn orders(&self, filter: &OrderFilter) -> ShopResult<Vec<Order>> {
    self.ctx.reported(self.ctx.require_admin())?;
    Ok(self.orders_manager().list(filter))
  }

  pub fn update_order_status(&self, order_id: &str, next: OrderStatus) -> ShopResult<Order> {
    self.ctx.reported(self.ctx.require_admin())?;
    self.orders_manager().transition(order_id, next)
  }

  /// Customer accounts with their order activity, biggest spenders first.
  pub fn customers(&self) -> ShopResult<Vec<CustomerSummary>> {
    self.ctx.reported(self.ctx.require_admin())?;
    let users: Vec<User> = self.ctx.storage.load_or_empty(Collection::Users);
    let orders: Vec<Order> = self.ctx.storage.load_or_empty(Collection::Orders);

    let mut summaries: Vec<CustomerSummary> = users
      .into_iter()
      .filter(|u| u.role == Role::Customer)
      .map(|u| {
        let mine: Vec<&Order> = orders.iter().filter(|o| o.user_id == u.id).collect();
        CustomerSummary {
          order_count: mine.len(),
          total_spent: mine
            .iter()
            .filter(|o| o.status != OrderStatus::Cancelled)
            .map(|o| o.total)
            .sum(),
          last_order_at: mine.iter().map(|o| o.created_at).max(),
          user_id: u.id,
          name: u.name,
          email: u.email,
          phone: u.phone,
        }
      })
      .collect();
    summaries.sort_by(|a, b| {
      b.total_spent
        .cmp(&a.total_spent)
        .then_with(|| a.name.cmp(&b.name))
    });
    Ok(summaries)
  }

  /// Store-wide figures. `low_stock_threshold` overrides the shop setting.
  #[instrument(name = "AdminConsole::dashboard", skip(self))]
  pub fn dashboard(&self, low_stock_threshold: Option<u32>) -> ShopResult<DashboardStats> {
    self.ctx.reported(self.ctx.require_admin())?;
    let threshold = low_stock_threshold.unwrap_or(self.ctx.settings.low_stock_threshold);
    let products: Vec<Product> = self.ctx.storage.load_or_empty(Collection::Products);
    let orders: Vec<Order> = self.ctx.storage.load_or_empty(Collection::Orders);
    let users: Vec<User> = self.ctx.storage.load_or_empty(Collection::Users);

    let live: Vec<&Order> = orders
      .iter()
      .filter(|o| o.status != OrderStatus::Cancelled)
      .collect();

    let orders_by_status = OrderStatus::ALL
      .iter()
      .map(|s| (*s, orders.iter().filter(|o| o.status == *s).count()))
      .collect();

    let mut low_stock: Vec<Product> = products
      .iter()
      .filter(|p| p.stock <= threshold)
      .cloned()
      .collect();
    low_stock.sort_by(|a, b| a.stock.cmp(&b.stock).then_with(|| a.id.cmp(&b.id)));

    let mut sellers: HashMap<&str, TopSeller> = HashMap::new();
    for line in live.iter().flat_map(|o| o.items.iter()) {
      let entry = sellers.entry(line.product_id()).or_insert_with(|| TopSeller {
        product_id: line.product_id().to_string(),
        name: line.product.name.clone(),
        units: 0,
        revenue: Decimal::ZERO,
      });
      entry.units += line.quantity;
      entry.revenue += line.line_total();
    }
    let mut top_sellers: Vec<TopSeller> = sellers.into_values().collect();
    top_sellers.sort_by(|a, b| {
      b.units
        .cmp(&a.units)
        .then_with(|| b.revenue.cmp(&a.revenue))
        .then_with(|| a.product_id.cmp(&b.product_id))
    });
    top_sellers.truncate(TOP_SELLER_COUNT);

    Ok(DashboardStats {
      revenue: live.iter().map(|o| o.total).sum(),
      order_count: orders.len(),
      orders_by_status,
      pending_orders: orders
        .iter()
        .filter(|o| o.status == OrderStatus::Pending)
        .count(),
      product_count: products.len(),
      low_stock,
      customer_count: users.iter().filter(|u| u.role == Role::Customer).count(),
      top_sellers,
    })
  }
}
