// glowcart/src/models/order.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Address, CartItem};
use crate::error::{ShopError, ShopResult};

/// Order lifecycle.
///
/// ```text
/// pending -> confirmed -> processing -> shipped -> delivered
///    \           \             \
///     +-----------+-------------+--> cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  #[default]
  Pending,
  Confirmed,
  Processing,
  Shipped,
  Delivered,
  Cancelled,
}

impl OrderStatus {
  pub const ALL: [OrderStatus; 6] = [
    OrderStatus::Pending,
    OrderStatus::Confirmed,
    OrderStatus::Processing,
    OrderStatus::Shipped,
    OrderStatus::Delivered,
    OrderStatus::Cancelled,
  ];

  /// The transition table.
  pub fn allowed_next(self) -> &'static [OrderStatus] {
    use OrderStatus::*;
    match self {
      Pending => &[Confirmed, Cancelled],
      Confirmed => &[Processing, Cancelled],
      Processing => &[Shipped, Cancelled],
      Shipped => &[Delivered],
      Delivered | Cancelled => &[],
    }
  }

  pub fn can_transition_to(self, next: OrderStatus) -> bool {
    self.allowed_next().contains(&next)
  }

  pub fn transition(self, next: OrderStatus) -> ShopResult<OrderStatus> {
    if self.can_transition_to(next) {
      Ok(next)
    } else {
      Err(ShopError::InvalidTransition { from: self, to: next })
    }
  }

  pub fn is_terminal(self) -> bool {
    self.allowed_next().is_empty()
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      OrderStatus::Pending => "pending",
      OrderStatus::Confirmed => "confirmed",
      OrderStatus::Processing => "processing",
      OrderStatus::Shipped => "shipped",
      OrderStatus::Delivered => "delivered",
      OrderStatus::Cancelled => "cancelled",
    }
  }
}

impl fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Customer details copied onto the order at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSnapshot {
  pub name: String,
  pub email: String,
  pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
  pub status: OrderStatus,
  pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
  pub id: String,
  pub user_id: String,
  pub items: Vec<CartItem>,
  pub subtotal: Decimal,
  pub total: Decimal,
  pub discount: Decimal,
  pub customer: CustomerSnapshot,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub shipping_address: Option<Address>,
  pub status: OrderStatus,
  #[serde(default)]
  pub status_history: Vec<StatusChange>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub notes: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Order {
  pub fn item_count(&self) -> u32 {
    self.items.iter().map(|i| i.quantity).sum()
  }

  /// Moves the order to `next` if the transition table allows it, recording
  /// the change in the history.
  pub fn apply_transition(&mut self, next: OrderStatus, at: DateTime<Utc>) -> ShopResult<()> {
    self.status = self.status.transition(next)?;
    self.status_history.push(StatusChange { status: next, at });
    self.updated_at = at;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::OrderStatus::{self, *};

  #[test]
  fn happy_path_is_linear() {
    let path = [Pending, Confirmed, Processing, Shipped, Delivered];
    for pair in path.windows(2) {
      assert!(pair[0].can_transition_to(pair[1]), "{} -> {}", pair[0], pair[1]);
    }
    assert!(!Pending.can_transition_to(Shipped));
    assert!(!Confirmed.can_transition_to(Pending));
  }

  #[test]
  fn cancel_only_before_shipping() {
    for from in [Pending, Confirmed, Processing] {
      assert_eq!(from.transition(Cancelled).unwrap(), Cancelled);
    }
    assert!(Shipped.transition(Cancelled).is_err());
  }

  #[test]
  fn terminal_states_reject_everything() {
    for from in [Delivered, Cancelled] {
      assert!(from.is_terminal());
      for to in OrderStatus::ALL {
        assert!(from.transition(to).is_err(), "{} -> {} should fail", from, to);
      }
    }
  }

  #[test]
  fn self_transitions_are_illegal() {
    for s in OrderStatus::ALL {
      assert!(!s.can_transition_to(s));
    }
  }
}
