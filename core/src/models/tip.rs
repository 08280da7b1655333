// glowcart/src/models/tip.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipCategory {
  Skincare,
  Makeup,
  Haircare,
  Fragrance,
  Wellness,
}

/// A beauty tip / blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tip {
  pub id: String,
  pub title: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub excerpt: Option<String>,
  pub content: String,
  pub category: TipCategory,
  pub author: String,
  pub publish_date: DateTime<Utc>,
  #[serde(default)]
  pub featured: bool,
  #[serde(default)]
  pub tags: BTreeSet<String>,
}

impl Tip {
  pub fn matches(&self, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
      return true;
    }
    self.title.to_lowercase().contains(&needle)
      || self.content.to_lowercase().contains(&needle)
      || self.tags.iter().any(|t| t.to_lowercase().contains(&needle))
  }
}
