// tests/cart_tests.rs
mod common;

use common::*;
use glowcart::models::Category;
use glowcart::{Collection, PreconditionFailure, Severity, ShopError};
use rust_decimal::Decimal;

#[test]
fn test_add_merges_into_one_line_per_product() {
  let t = test_shop();
  let cart = t.shop.cart();

  cart.add_to_cart("p1", 1).unwrap();
  cart.add_to_cart("p2", 1).unwrap();
  cart.add_to_cart("p1", 2).unwrap();

  let lines = cart.lines();
  assert_eq!(lines.len(), 2);
  assert_eq!(cart.line("p1").unwrap().quantity, 3);
  assert_eq!(cart.item_count(), 4);
}

#[test]
fn test_total_and_discount_for_two_discounted_lipsticks() {
  let t = test_shop();
  let cart = t.shop.cart();

  cart.add_to_cart("p1", 2).unwrap();

  assert_eq!(cart.cart_total(), Decimal::from(340));
  assert_eq!(cart.cart_discount(), Decimal::from(60));
}

#[test]
fn test_stale_original_price_below_price_gives_no_discount() {
  let t = test_shop();
  let mut products = t.products();
  products.push(product("p9", "Kohl Liner", Category::Face, 90, Some(60), 4));
  t.storage.save(Collection::Products, &products).unwrap();

  t.shop.cart().add_to_cart("p9", 2).unwrap();
  t.shop.cart().add_to_cart("p1", 1).unwrap();

  assert_eq!(t.shop.cart().cart_discount(), Decimal::from(30));
  assert_eq!(t.shop.cart().cart_total(), Decimal::from(350));
}

#[test]
fn test_line_keeps_snapshot_price_after_catalog_edit() {
  let t = test_shop();
  let cart = t.shop.cart();
  cart.add_to_cart("p1", 2).unwrap();

  let mut products = t.products();
  products[0].price = Decimal::from(999);
  t.storage.save(Collection::Products, &products).unwrap();

  assert_eq!(cart.line("p1").unwrap().product.price, Decimal::from(170));
  assert_eq!(cart.cart_total(), Decimal::from(340));
}

#[test]
fn test_add_caps_quantity_at_live_stock_and_warns() {
  let t = test_shop();
  let cart = t.shop.cart();

  let line = cart.add_to_cart("p2", 5).unwrap();

  assert_eq!(line.quantity, 3);
  assert_eq!(t.notifier.last().unwrap().1, Severity::Warning);

  // Already at the cap: merging more keeps the line at stock.
  let line = cart.add_to_cart("p2", 1).unwrap();
  assert_eq!(line.quantity, 3);
}

#[test]
fn test_add_sold_out_product_is_refused() {
  let t = test_shop();
  let cart = t.shop.cart();

  let err = cart.add_to_cart("p3", 1).unwrap_err();

  assert_eq!(
    err.precondition(),
    Some(&PreconditionFailure::OutOfStock {
      product_id: "p3".to_string()
    })
  );
  assert!(cart.is_empty());
}

#[test]
fn test_add_unknown_product_is_not_found() {
  let t = test_shop();
  let err = t.shop.cart().add_to_cart("nope", 1).unwrap_err();
  assert!(matches!(err, ShopError::NotFound { entity: "Product", .. }));
  assert_eq!(t.notifier.last().unwrap().1, Severity::Warning);
}

#[test]
fn test_add_zero_quantity_is_a_validation_error() {
  let t = test_shop();
  let err = t.shop.cart().add_to_cart("p1", 0).unwrap_err();
  assert!(matches!(err, ShopError::Validation(_)));
  assert_eq!(t.notifier.last().unwrap().1, Severity::Error);
}

#[test]
fn test_set_quantity_zero_or_negative_removes_line() {
  let t = test_shop();
  let cart = t.shop.cart();
  cart.add_to_cart("p1", 2).unwrap();
  cart.add_to_cart("p2", 1).unwrap();

  assert_eq!(cart.set_quantity("p1", 0).unwrap(), None);
  assert_eq!(cart.set_quantity("p2", -4).unwrap(), None);

  assert!(cart.is_empty());
  assert!(cart.lines().iter().all(|l| l.quantity >= 1));
}

#[test]
fn test_set_quantity_overwrites_and_caps() {
  let t = test_shop();
  let cart = t.shop.cart();
  cart.add_to_cart("p1", 1).unwrap();

  let line = cart.set_quantity("p1", 4).unwrap().unwrap();
  assert_eq!(line.quantity, 4);

  let line = cart.set_quantity("p1", 50).unwrap().unwrap();
  assert_eq!(line.quantity, 10);
}

#[test]
fn test_set_quantity_on_missing_line_is_not_found() {
  let t = test_shop();
  let err = t.shop.cart().set_quantity("p1", 2).unwrap_err();
  assert!(matches!(err, ShopError::NotFound { entity: "Cart line", .. }));
}

#[test]
fn test_set_quantity_drops_line_once_product_sells_out() {
  let t = test_shop();
  let cart = t.shop.cart();
  cart.add_to_cart("p2", 2).unwrap();

  let mut products = t.products();
  products.iter_mut().filter(|p| p.id == "p2").for_each(|p| {
    p.stock = 0;
    p.normalize();
  });
  t.storage.save(Collection::Products, &products).unwrap();

  assert_eq!(cart.set_quantity("p2", 1).unwrap(), None);
  assert!(cart.line("p2").is_none());
}

#[test]
fn test_remove_and_clear() {
  let t = test_shop();
  let cart = t.shop.cart();
  cart.add_to_cart("p1", 1).unwrap();
  cart.add_to_cart("p4", 1).unwrap();

  assert!(cart.remove_from_cart("p1").unwrap());
  assert!(!cart.remove_from_cart("p1").unwrap());
  assert_eq!(cart.lines().len(), 1);

  cart.clear().unwrap();
  assert!(cart.is_empty());
  assert_eq!(cart.cart_total(), Decimal::ZERO);
}

#[test]
fn test_mutations_publish_cart_changed() {
  let t = test_shop();
  let cart = t.shop.cart();
  t.listener.clear();

  cart.add_to_cart("p1", 1).unwrap();
  cart.set_quantity("p1", 2).unwrap();
  cart.remove_from_cart("p1").unwrap();

  assert_eq!(t.listener.names(), vec!["cart_changed"; 3]);
}

#[test]
fn test_cart_survives_reload_through_the_store() {
  let t = test_shop();
  t.shop.cart().add_to_cart("p1", 2).unwrap();
  t.shop.cart().add_to_cart("p4", 1).unwrap();

  let reloaded: Vec<glowcart::models::CartItem> = t.storage.load(Collection::Cart).unwrap();
  assert_eq!(reloaded, t.shop.cart().lines());
  assert_eq!(reloaded[1].product.category, Category::Perfumes);
}
