// glowcart/src/managers/catalog.rs

use std::cmp::Ordering;

use rust_decimal::Decimal;
use tracing::instrument;

use crate::context::ShopContext;
use crate::error::{ShopError, ShopResult};
use crate::models::{Category, Product};
use crate::store::Collection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSort {
  /// Featured products first, then best rated.
  #[default]
  Featured,
  PriceLowHigh,
  PriceHighLow,
  Rating,
  Newest,
  Name,
}

/// Catalog filter. Unset fields do not filter.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
  pub category: Option<Category>,
  pub search: Option<String>,
  pub min_price: Option<Decimal>,
  pub max_price: Option<Decimal>,
  pub tag: Option<String>,
  pub in_stock_only: bool,
  pub on_sale_only: bool,
  pub featured_only: bool,
  pub sort: ProductSort,
  pub limit: Option<usize>,
}

impl ProductQuery {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn category(mut self, category: Category) -> Self {
    self.category = Some(category);
    self
  }

  pub fn search(mut self, needle: impl Into<String>) -> Self {
    self.search = Some(needle.into());
    self
  }

  pub fn price_between(mut self, min: Option<Decimal>, max: Option<Decimal>) -> Self {
    self.min_price = min;
    self.max_price = max;
    self
  }

  pub fn tag(mut self, tag: impl Into<String>) -> Self {
    self.tag = Some(tag.into());
    self
  }

  pub fn in_stock_only(mut self) -> Self {
    self.in_stock_only = true;
    self
  }

  pub fn on_sale_only(mut self) -> Self {
    self.on_sale_only = true;
    self
  }

  pub fn featured_only(mut self) -> Self {
    self.featured_only = true;
    self
  }

  pub fn sort(mut self, sort: ProductSort) -> Self {
    self.sort = sort;
    self
  }

  pub fn limit(mut self, limit: usize) -> Self {
    self.limit = Some(limit);
    self
  }

  pub fn matches(&self, product: &Product) -> bool {
    if self.category.is_some_and(|c| c != product.category) {
      return false;
    }
    if self.min_price.is_some_and(|min| product.price < min) {
      return false;
    }
    if self.max_price.is_some_and(|max| product.price > max) {
      return false;
    }
    if self.tag.as_deref().is_some_and(|tag| !product.has_tag(tag)) {
      return false;
    }
    if self.in_stock_only && !product.is_available() {
      return false;
    }
    if self.on_sale_only && !product.is_on_sale() {
      return false;
    }
    if self.featured_only && !product.featured {
      return false;
    }
    match self.search.as_deref().map(str::trim) {
      Some(needle) if !needle.is_empty() => search_matches(product, &needle.to_lowercase()),
      _ => true,
    }
  }
}

fn search_matches(product: &Product, needle: &str) -> bool {
  product.name.to_lowercase().contains(needle)
    || product.sku.to_lowercase().contains(needle)
    || product
      .description
      .as_deref()
      .is_some_and(|d| d.to_lowercase().contains(needle))
    || product.tags.iter().any(|t| t.to_lowercase().contains(needle))
}

fn compare(sort: ProductSort, a: &Product, b: &Product) -> Ordering {
  let by_rating = || {
    b.rating
      .total_cmp(&a.rating)
      .then_with(|| b.review_count.cmp(&a.review_count))
  };
  match sort {
    ProductSort::Featured => b.featured.cmp(&a.featured).then_with(by_rating),
    ProductSort::PriceLowHigh => a.price.cmp(&b.price),
    ProductSort::PriceHighLow => b.price.cmp(&a.price),
    ProductSort::Rating => by_rating(),
    ProductSort::Newest => b.created_at.cmp(&a.created_at),
    ProductSort::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
  }
  .then_with(|| a.id.cmp(&b.id))
}

/// Read side of the product collection.
#[derive(Clone)]
pub struct CatalogManager {
  ctx: ShopContext,
}

impl CatalogManager {
  pub fn new(ctx: ShopContext) -> Self {
    Self { ctx }
  }

  pub fn all(&self) -> Vec<Product> {
    self.ctx.storage.load_or_empty(Collection::Products)
  }

  pub fn find(&self, product_id: &str) -> Option<Product> {
    self.all().into_iter().find(|p| p.id == product_id)
  }

  pub fn get(&self, product_id: &str) -> ShopResult<Product> {
    self
      .find(product_id)
      .ok_or_else(|| ShopError::not_found("Product", product_id))
  }

  #[instrument(name = "CatalogManager::query", skip(self), level = "debug")]
  pub fn query(&self, query: &ProductQuery) -> Vec<Product> {
    let mut products: Vec<Product> = self.all().into_iter().filter(|p| query.matches(p)).collect();
    products.sort_by(|a, b| compare(query.sort, a, b));
    if let Some(limit) = query.limit {
      products.truncate(limit);
    }
    products
  }

  pub fn featured(&self, limit: usize) -> Vec<Product> {
    self.query(&ProductQuery::new().featured_only().limit(limit))
  }

  /// Other products of the same category, best rated first.
  pub fn related(&self, product_id: &str, limit: usize) -> ShopResult<Vec<Product>> {
    let product = self.get(product_id)?;
    let mut related: Vec<Product> = self
      .query(&ProductQuery::new().category(product.category).sort(ProductSort::Rating))
      .into_iter()
      .filter(|p| p.id != product.id)
      .collect();
    related.truncate(limit);
    Ok(related)
  }

  /// Number of products per category, in category order, empty ones included.
  pub fn category_counts(&self) -> Vec<(Category, usize)> {
    let products = self.all();
    Category::ALL
      .into_iter()
      .map(|c| (c, products.iter().filter(|p| p.category == c).count()))
      .collect()
  }
}
