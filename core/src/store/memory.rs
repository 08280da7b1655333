// glowcart/src/store/memory.rs

//! In-memory record store, with an optional byte quota standing in for the
//! browser storage limit.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::{event, Level};

use super::{KeyWrite, RecordStore};
use crate::error::{StoreError, StoreResult};

#[derive(Debug, Default)]
pub struct MemoryStore {
  entries: RwLock<HashMap<String, String>>,
  quota_bytes: Option<usize>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// A store that refuses any batch leaving more than `quota_bytes` of keys
  /// and values behind.
  pub fn with_quota(quota_bytes: usize) -> Self {
    Self {
      entries: RwLock::new(HashMap::new()),
      quota_bytes: Some(quota_bytes),
    }
  }

  pub fn used_bytes(&self) -> usize {
    footprint(&self.entries.read())
  }
}

fn footprint(entries: &HashMap<String, String>) -> usize {
  entries.iter().map(|(k, v)| k.len() + v.len()).sum()
}

impl RecordStore for MemoryStore {
  fn get(&self, key: &str) -> StoreResult<Option<String>> {
    Ok(self.entries.read().get(key).cloned())
  }

  fn write_batch(&self, writes: Vec<KeyWrite>) -> StoreResult<()> {
    let mut entries = self.entries.write();
    let mut next = entries.clone();
    for (key, value) in writes {
      match value {
        Some(v) => {
          next.insert(key, v);
        }
        None => {
          next.remove(&key);
        }
      }
    }

    if let Some(limit) = self.quota_bytes {
      let required = footprint(&next);
      if required > limit {
        event!(Level::WARN, required, limit, "Memory store quota exceeded, batch rejected.");
        return Err(StoreError::QuotaExceeded { required, limit });
      }
    }

    *entries = next;
    Ok(())
  }

  fn keys(&self) -> StoreResult<Vec<String>> {
    let mut keys: Vec<String> = self.entries.read().keys().cloned().collect();
    keys.sort();
    Ok(keys)
  }
}
