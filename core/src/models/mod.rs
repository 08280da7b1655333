// glowcart/src/models/mod.rs

//! Record types persisted in the local record store.

pub mod cart_item;
pub mod offer;
pub mod order;
pub mod product;
pub mod tip;
pub mod user;

pub use cart_item::CartItem;
pub use offer::{Offer, OfferType};
pub use order::{CustomerSnapshot, Order, OrderStatus, StatusChange};
pub use product::{Category, Product, ProductStatus};
pub use tip::{Tip, TipCategory};
pub use user::{Address, Preferences, Role, Theme, User};

use uuid::Uuid;

/// Generates a record id such as `ord-3f2a...`.
pub fn new_id(prefix: &str) -> String {
  format!("{}-{}", prefix, Uuid::new_v4().simple())
}
