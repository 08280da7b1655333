// glowcart/src/store/file.rs

//! A record store persisted as a single JSON object on disk. Each batch
//! rewrites the whole document through a temporary file and a rename, so a
//! crash leaves either the old or the new document.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::{event, instrument, Level};

use super::{KeyWrite, RecordStore};
use crate::error::{StoreError, StoreResult};

#[derive(Debug)]
pub struct FileStore {
  path: PathBuf,
  entries: Mutex<BTreeMap<String, String>>,
  quota_bytes: Option<usize>,
}

impl FileStore {
  /// Opens the document at `path`, starting empty when it does not exist yet.
  #[instrument(name = "FileStore::open", skip_all, fields(path = %path.as_ref().display()), err(Display))]
  pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
    let path = path.as_ref().to_path_buf();
    let entries = if path.exists() {
      let raw = fs::read_to_string(&path)?;
      if raw.trim().is_empty() {
        BTreeMap::new()
      } else {
        serde_json::from_str(&raw).map_err(|source| StoreError::Serialization {
          key: path.display().to_string(),
          source,
        })?
      }
    } else {
      BTreeMap::new()
    };
    event!(Level::INFO, keys = entries.len(), "File store opened.");
    Ok(Self {
      path,
      entries: Mutex::new(entries),
      quota_bytes: None,
    })
  }

  /// Refuses any batch that would grow the document past `quota_bytes`.
  pub fn with_quota(mut self, quota_bytes: usize) -> Self {
    self.quota_bytes = Some(quota_bytes);
    self
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  fn persist(&self, entries: &BTreeMap<String, String>) -> StoreResult<()> {
    let body = serde_json::to_string(entries).map_err(|source| StoreError::Serialization {
      key: self.path.display().to_string(),
      source,
    })?;
    if let Some(limit) = self.quota_bytes {
      if body.len() > limit {
        event!(Level::WARN, required = body.len(), limit, "File store quota exceeded, batch rejected.");
        return Err(StoreError::QuotaExceeded {
          required: body.len(),
          limit,
        });
      }
    }
    let tmp_path = self.path.with_extension("tmp");
    {
      let mut tmp = fs::File::create(&tmp_path)?;
      tmp.write_all(body.as_bytes())?;
      tmp.sync_all()?;
    }
    fs::rename(&tmp_path, &self.path)?;
    Ok(())
  }
}

impl RecordStore for FileStore {
  fn get(&self, key: &str) -> StoreResult<Option<String>> {
    Ok(self.entries.lock().get(key).cloned())
  }

  fn write_batch(&self, writes: Vec<KeyWrite>) -> StoreResult<()> {
    let mut entries = self.entries.lock();
    let mut next = entries.clone();
    let write_count = writes.len();
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
    self.persist(&next)?;
    *entries = next;
    event!(Level::DEBUG, write_count, "File store batch committed.");
    Ok(())
  }

  fn keys(&self) -> StoreResult<Vec<String>> {
    Ok(self.entries.lock().keys().cloned().collect())
  }
}
