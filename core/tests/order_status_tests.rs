// tests/order_status_tests.rs
mod common;

use common::*;
use glowcart::models::{Order, OrderStatus};
use glowcart::{Collection, OrderFilter, PreconditionFailure, ShopError, ShopEvent};

fn placed_order(t: &TestShop, product_id: &str, quantity: u32) -> Order {
  t.shop.cart().add_to_cart(product_id, quantity).unwrap();
  t.shop.checkout().checkout().unwrap()
}

#[test]
fn test_order_walks_the_happy_path() {
  let t = test_shop();
  t.sign_in_customer();
  let order = placed_order(&t, "p1", 1);
  let orders = t.shop.orders();

  for next in [
    OrderStatus::Confirmed,
    OrderStatus::Processing,
    OrderStatus::Shipped,
    OrderStatus::Delivered,
  ] {
    orders.transition(&order.id, next).unwrap();
  }

  let stored = orders.get(&order.id).unwrap();
  assert_eq!(stored.status, OrderStatus::Delivered);
  let history: Vec<OrderStatus> = stored.status_history.iter().map(|c| c.status).collect();
  assert_eq!(
    history,
    vec![
      OrderStatus::Pending,
      OrderStatus::Confirmed,
      OrderStatus::Processing,
      OrderStatus::Shipped,
      OrderStatus::Delivered
    ]
  );
  assert!(stored.updated_at >= stored.created_at);
}

#[test]
fn test_illegal_transition_is_refused_and_order_unchanged() {
  let t = test_shop();
  t.sign_in_customer();
  let order = placed_order(&t, "p1", 1);

  let err = t
    .shop
    .orders()
    .transition(&order.id, OrderStatus::Delivered)
    .unwrap_err();

  assert!(matches!(
    err,
    ShopError::InvalidTransition {
      from: OrderStatus::Pending,
      to: OrderStatus::Delivered
    }
  ));
  assert_eq!(t.shop.orders().get(&order.id).unwrap(), order);
}

#[test]
fn test_terminal_orders_do_not_move() {
  let t = test_shop();
  t.sign_in_customer();
  let order = placed_order(&t, "p1", 1);
  t.shop.orders().cancel(&order.id).unwrap();

  for next in OrderStatus::ALL {
    assert!(t.shop.orders().transition(&order.id, next).is_err());
  }
}

#[test]
fn test_cancel_restores_stock() {
  let t = test_shop();
  t.sign_in_customer();
  let order = placed_order(&t, "p2", 3);
  assert_eq!(t.stock_of("p2"), 0);

  t.shop.orders().cancel(&order.id).unwrap();

  assert_eq!(t.stock_of("p2"), 3);
  let p2 = t.products().into_iter().find(|p| p.id == "p2").unwrap();
  assert!(p2.is_available());
}

#[test]
fn test_transition_publishes_status_change() {
  let t = test_shop();
  t.sign_in_customer();
  let order = placed_order(&t, "p1", 1);
  t.listener.clear();

  t.shop.orders().transition(&order.id, OrderStatus::Confirmed).unwrap();

  assert!(t.listener.events.lock().contains(&ShopEvent::OrderStatusChanged {
    order_id: order.id.clone(),
    from: OrderStatus::Pending,
    to: OrderStatus::Confirmed,
  }));
}

#[test]
fn test_unknown_order_is_not_found() {
  let t = test_shop();
  let err = t.shop.orders().transition("ord-missing", OrderStatus::Confirmed).unwrap_err();
  assert!(matches!(err, ShopError::NotFound { entity: "Order", .. }));
}

#[test]
fn test_customer_can_cancel_only_own_orders() {
  let t = test_shop();
  t.sign_in_customer();
  let order = placed_order(&t, "p1", 1);

  let other = customer_input("Sara", "sara@example.ma");
  let password = other.password.clone();
  t.shop.profile().register(other).unwrap();
  t.shop.profile().login("sara@example.ma", &password).unwrap();

  let err = t.shop.orders().cancel_own(&order.id).unwrap_err();
  assert_eq!(err.precondition(), Some(&PreconditionFailure::Forbidden));

  t.shop.profile().login("amal@example.ma", "secret123").unwrap();
  let cancelled = t.shop.orders().cancel_own(&order.id).unwrap();
  assert_eq!(cancelled.status, OrderStatus::Cancelled);
}

#[test]
fn test_list_filters_and_sorts_newest_first() {
  let t = test_shop();
  let user = t.sign_in_customer();
  let first = placed_order(&t, "p1", 1);
  let second = placed_order(&t, "p4", 1);
  t.shop.orders().transition(&second.id, OrderStatus::Confirmed).unwrap();

  let all = t.shop.orders().list(&OrderFilter::default());
  assert_eq!(all.len(), 2);
  assert!(all[0].created_at >= all[1].created_at);

  let pending = t.shop.orders().list(&OrderFilter {
    status: Some(OrderStatus::Pending),
    ..OrderFilter::default()
  });
  assert_eq!(pending.iter().map(|o| o.id.as_str()).collect::<Vec<_>>(), vec![first.id.as_str()]);

  let by_email = t.shop.orders().list(&OrderFilter {
    search: Some("AMAL@".to_string()),
    ..OrderFilter::default()
  });
  assert_eq!(by_email.len(), 2);
  assert_eq!(t.shop.orders().for_user(&user.id).len(), 2);
  assert!(t.shop.orders().for_user("someone-else").is_empty());

  let stored: Vec<Order> = t.storage.load(Collection::Orders).unwrap();
  assert_eq!(stored.len(), 2);
}
