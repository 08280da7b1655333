// glowcart/src/managers/tips.rs

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::context::ShopContext;
use crate::error::{ShopError, ShopResult};
use crate::events::ShopEvent;
use crate::models::{new_id, Tip, TipCategory};
use crate::store::Collection;

#[derive(Debug, Clone)]
pub struct TipInput {
  pub id: Option<String>,
  pub title: String,
  pub excerpt: Option<String>,
  pub content: String,
  pub category: TipCategory,
  pub author: String,
  /// Defaults to now.
  pub publish_date: Option<DateTime<Utc>>,
  pub featured: bool,
  pub tags: BTreeSet<String>,
}

#[derive(Clone)]
pub struct TipManager {
  ctx: ShopContext,
}

impl TipManager {
  pub fn new(ctx: ShopContext) -> Self {
    Self { ctx }
  }

  pub fn all(&self) -> Vec<Tip> {
    self.ctx.storage.load_or_empty(Collection::Tips)
  }

  pub fn get(&self, tip_id: &str) -> ShopResult<Tip> {
    self
      .all()
      .into_iter()
      .find(|t| t.id == tip_id)
      .ok_or_else(|| ShopError::not_found("Tip", tip_id))
  }

  /// Tips published at or before `now`, newest first.
  pub fn published(&self, now: DateTime<Utc>) -> Vec<Tip> {
    let mut tips: Vec<Tip> = self.all().into_iter().filter(|t| t.publish_date <= now).collect();
    tips.sort_by(|a, b| b.publish_date.cmp(&a.publish_date).then_with(|| a.id.cmp(&b.id)));
    tips
  }

  pub fn by_category(&self, category: TipCategory, now: DateTime<Utc>) -> Vec<Tip> {
    self
      .published(now)
      .into_iter()
      .filter(|t| t.category == category)
      .collect()
  }

  pub fn featured(&self, now: DateTime<Utc>) -> Vec<Tip> {
    self.published(now).into_iter().filter(|t| t.featured).collect()
  }

  pub fn search(&self, needle: &str, now: DateTime<Utc>) -> Vec<Tip> {
    self.published(now).into_iter().filter(|t| t.matches(needle)).collect()
  }

  pub fn save(&self, input: TipInput) -> ShopResult<Tip> {
    let result = self.save_inner(input);
    self.ctx.reported(result)
  }

  fn save_inner(&self, input: TipInput) -> ShopResult<Tip> {
    self.ctx.require_admin()?;
    if input.title.trim().is_empty() || input.content.trim().is_empty() {
      return Err(ShopError::validation("Tip title and content are required"));
    }
    let mut tips: Vec<Tip> = self.ctx.storage.load(Collection::Tips)?;
    let tip = Tip {
      id: input.id.clone().unwrap_or_else(|| new_id("tip")),
      title: input.title.trim().to_string(),
      excerpt: input.excerpt,
      content: input.content,
      category: input.category,
      author: input.author,
      publish_date: input.publish_date.unwrap_or_else(Utc::now),
      featured: input.featured,
      tags: input.tags,
    };
    match tips.iter_mut().find(|t| t.id == tip.id) {
      Some(existing) => *existing = tip.clone(),
      None if input.id.is_some() => return Err(ShopError::not_found("Tip", tip.id)),
      None => tips.push(tip.clone()),
    }
    self.ctx.storage.save(Collection::Tips, &tips)?;
    self.ctx.publish(ShopEvent::TipsChanged);
    Ok(tip)
  }

  pub fn delete(&self, tip_id: &str) -> ShopResult<()> {
    let result = self.ctx.require_admin().and_then(|_| {
      let mut tips: Vec<Tip> = self.ctx.storage.load(Collection::Tips)?;
      let before = tips.len();
      tips.retain(|t| t.id != tip_id);
      if tips.len() == before {
        return Err(ShopError::not_found("Tip", tip_id));
      }
      self.ctx.storage.save(Collection::Tips, &tips)?;
      self.ctx.publish(ShopEvent::TipsChanged);
      Ok(())
    });
    self.ctx.reported(result)
  }
}
