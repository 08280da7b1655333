// tests/catalog_tests.rs
mod common;

use common::*;
use glowcart::models::Category;
use glowcart::{ProductQuery, ProductSort, ShopError};
use rust_decimal::Decimal;

fn ids(products: &[glowcart::models::Product]) -> Vec<&str> {
  products.iter().map(|p| p.id.as_str()).collect()
}

#[test]
fn test_default_query_lists_featured_first() {
  let t = test_shop();
  let products = t.shop.catalog().query(&ProductQuery::new());
  assert_eq!(products.len(), 4);
  assert_eq!(products[0].id, "p4");
}

#[test]
fn test_filter_by_category() {
  let t = test_shop();
  let lips = t.shop.catalog().query(&ProductQuery::new().category(Category::Lips));
  assert_eq!(ids(&lips), vec!["p1"]);
}

#[test]
fn test_search_is_case_insensitive_over_name_tags_and_sku() {
  let t = test_shop();
  let catalog = t.shop.catalog();
  assert_eq!(ids(&catalog.query(&ProductQuery::new().search("VELVET"))), vec!["p1"]);
  assert_eq!(ids(&catalog.query(&ProductQuery::new().search("argan"))), vec!["p2"]);
  assert_eq!(ids(&catalog.query(&ProductQuery::new().search("p3"))), vec!["p3"]);
  assert!(catalog.query(&ProductQuery::new().search("mascara")).is_empty());
  assert_eq!(catalog.query(&ProductQuery::new().search("   ")).len(), 4);
}

#[test]
fn test_price_range_stock_and_sale_filters() {
  let t = test_shop();
  let catalog = t.shop.catalog();

  let mid = catalog.query(
    &ProductQuery::new()
      .price_between(Some(Decimal::from(150)), Some(Decimal::from(300)))
      .sort(ProductSort::PriceLowHigh),
  );
  assert_eq!(ids(&mid), vec!["p1", "p3"]);

  let in_stock = catalog.query(&ProductQuery::new().in_stock_only().sort(ProductSort::Name));
  assert_eq!(ids(&in_stock), vec!["p2", "p4", "p1"]);

  let on_sale = catalog.query(&ProductQuery::new().on_sale_only().sort(ProductSort::PriceHighLow));
  assert_eq!(ids(&on_sale), vec!["p4", "p1"]);
}

#[test]
fn test_sorts_and_limit() {
  let t = test_shop();
  let catalog = t.shop.catalog();

  let newest = catalog.query(&ProductQuery::new().sort(ProductSort::Newest).limit(1));
  assert_eq!(ids(&newest), vec!["p2"]);

  let rated = catalog.query(&ProductQuery::new().sort(ProductSort::Rating).limit(2));
  assert_eq!(ids(&rated), vec!["p4", "p1"]);

  let tagged = catalog.query(&ProductQuery::new().tag("MATTE"));
  assert_eq!(ids(&tagged), vec!["p1"]);
}

#[test]
fn test_featured_and_related() {
  let t = test_shop();
  let catalog = t.shop.catalog();
  assert_eq!(ids(&catalog.featured(4)), vec!["p4"]);
  assert!(catalog.related("p1", 3).unwrap().is_empty());
  assert!(matches!(catalog.related("zz", 3), Err(ShopError::NotFound { .. })));
}

#[test]
fn test_category_counts_include_empty_categories() {
  let t = test_shop();
  let counts = t.shop.catalog().category_counts();
  assert_eq!(counts.len(), Category::ALL.len());
  assert!(counts.contains(&(Category::Body, 0)));
  assert!(counts.contains(&(Category::Lips, 1)));
}

#[test]
fn test_discount_and_status_are_derived() {
  let t = test_shop();
  let p1 = t.shop.catalog().get("p1").unwrap();
  assert_eq!(p1.discount, Some(15));
  assert!(p1.is_on_sale());
  let p3 = t.shop.catalog().get("p3").unwrap();
  assert!(!p3.is_available());
}
