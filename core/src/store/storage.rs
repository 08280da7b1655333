// glowcart/src/store/storage.rs

//! Typed collection access over a `RecordStore`.
//!
//! Each collection is stored as `{"version": N, "records": [...]}`. A bare
//! JSON array is the unversioned layout written by older builds; it is read as
//! version 0 and replaced with the current envelope on the next write.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{event, Level};

use super::{Collection, KeyWrite, MemoryStore, RecordStore};
use crate::error::{StoreError, StoreResult};

/// Envelope version written by this build.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
  version: u32,
  records: &'a [T],
}

/// The store service handed to every manager. Cheap to clone.
#[derive(Clone)]
pub struct Storage {
  backend: Arc<dyn RecordStore>,
}

impl Storage {
  pub fn new(backend: Arc<dyn RecordStore>) -> Self {
    Self { backend }
  }

  pub fn in_memory() -> Self {
    Self::new(Arc::new(MemoryStore::new()))
  }

  pub fn backend(&self) -> &Arc<dyn RecordStore> {
    &self.backend
  }

  /// Reads a collection. A missing key is an empty collection.
  pub fn load<T: DeserializeOwned>(&self, collection: Collection) -> StoreResult<Vec<T>> {
    match self.backend.get(collection.key())? {
      Some(raw) => decode(collection.key(), &raw),
      None => Ok(Vec::new()),
    }
  }

  /// Reads a collection, logging and swallowing store failures as an empty
  /// collection.
  pub fn load_or_empty<T: DeserializeOwned>(&self, collection: Collection) -> Vec<T> {
    self.load(collection).unwrap_or_else(|e| {
      event!(Level::WARN, %collection, error = %e, "Collection unreadable, treating as empty.");
      Vec::new()
    })
  }

  pub fn save<T: Serialize>(&self, collection: Collection, records: &[T]) -> StoreResult<()> {
    let mut batch = self.batch();
    batch.put(collection, records)?;
    batch.commit()
  }

  /// Starts a set of writes that is committed atomically.
  pub fn batch(&self) -> WriteBatch<'_> {
    WriteBatch {
      storage: self,
      writes: Vec::new(),
    }
  }
}

/// Collects collection writes and hands them to the backend as one batch.
pub struct WriteBatch<'a> {
  storage: &'a Storage,
  writes: Vec<KeyWrite>,
}

impl WriteBatch<'_> {
  pub fn put<T: Serialize>(&mut self, collection: Collection, records: &[T]) -> StoreResult<()> {
    let raw = encode(collection.key(), records)?;
    self.writes.push((collection.key().to_string(), Some(raw)));
    Ok(())
  }

  pub fn remove(&mut self, collection: Collection) {
    self.writes.push((collection.key().to_string(), None));
  }

  pub fn is_empty(&self) -> bool {
    self.writes.is_empty()
  }

  pub fn commit(self) -> StoreResult<()> {
    if self.writes.is_empty() {
      return Ok(());
    }
    let keys: Vec<&str> = self.writes.iter().map(|(k, _)| k.as_str()).collect();
    event!(Level::DEBUG, ?keys, "Committing store batch.");
    self.storage.backend.write_batch(self.writes).map_err(|e| {
      event!(Level::ERROR, error = %e, "Store batch rejected, changes lost.");
      e
    })
  }
}

fn encode<T: Serialize>(key: &str, records: &[T]) -> StoreResult<String> {
  serde_json::to_string(&EnvelopeRef {
    version: FORMAT_VERSION,
    records,
  })
  .map_err(|source| StoreError::Serialization {
    key: key.to_string(),
    source,
  })
}

fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> StoreResult<Vec<T>> {
  let serialization = |source| StoreError::Serialization {
    key: key.to_string(),
    source,
  };
  let value: Value = serde_json::from_str(raw).map_err(serialization)?;
  let records = match value {
    Value::Array(_) => value,
    Value::Object(mut map) => {
      let found = map.get("version").and_then(Value::as_u64).unwrap_or(0);
      if found > u64::from(FORMAT_VERSION) {
        return Err(StoreError::UnsupportedVersion {
          key: key.to_string(),
          found,
          supported: FORMAT_VERSION,
        });
      }
      map.remove("records").unwrap_or_else(|| Value::Array(Vec::new()))
    }
    Value::Null => return Ok(Vec::new()),
    other => other,
  };
  serde_json::from_value(records).map_err(serialization)
}
