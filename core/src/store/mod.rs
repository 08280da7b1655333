// glowcart/src/store/mod.rs

//! The local record store: a key/value backend holding one JSON document per
//! collection, and the typed `Storage` service the managers are given.

pub mod file;
pub mod memory;
pub mod storage;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use storage::{Storage, WriteBatch, FORMAT_VERSION};

use crate::error::StoreResult;
use std::fmt;

/// A pending write: `Some(value)` stores, `None` removes the key.
pub type KeyWrite = (String, Option<String>);

/// Raw key/value persistence. Implementations apply a batch entirely or not
/// at all.
pub trait RecordStore: Send + Sync {
  fn get(&self, key: &str) -> StoreResult<Option<String>>;

  fn write_batch(&self, writes: Vec<KeyWrite>) -> StoreResult<()>;

  fn keys(&self) -> StoreResult<Vec<String>>;
}

/// The collections kept in the store, one key each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
  Products,
  Orders,
  Users,
  Cart,
  Offers,
  Tips,
  Wishlist,
}

impl Collection {
  pub const ALL: [Collection; 7] = [
    Collection::Products,
    Collection::Orders,
    Collection::Users,
    Collection::Cart,
    Collection::Offers,
    Collection::Tips,
    Collection::Wishlist,
  ];

  pub fn key(&self) -> &'static str {
    match self {
      Collection::Products => "beauty.products",
      Collection::Orders => "beauty.orders",
      Collection::Users => "beauty.users",
      Collection::Cart => "beauty.cart",
      Collection::Offers => "beauty.offers",
      Collection::Tips => "beauty.tips",
      Collection::Wishlist => "beauty.wishlist",
    }
  }
}

impl fmt::Display for Collection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.key())
  }
}
