// glowcart/src/models/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::CustomerSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  #[default]
  Customer,
  Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
  #[default]
  Light,
  Dark,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
  pub language: String,
  pub theme: Theme,
  pub newsletter: bool,
  pub order_updates: bool,
}

impl Default for Preferences {
  fn default() -> Self {
    Self {
      language: "en".to_string(),
      theme: Theme::Light,
      newsletter: false,
      order_updates: true,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
  pub id: String,
  pub label: String,
  pub recipient: String,
  pub street: String,
  pub city: String,
  #[serde(default)]
  pub region: String,
  #[serde(default)]
  pub postal_code: String,
  #[serde(default)]
  pub country: String,
  #[serde(default)]
  pub phone: String,
  #[serde(default)]
  pub is_default: bool,
}

impl Address {
  /// One-line form used in order summaries.
  pub fn one_line(&self) -> String {
    [&self.street, &self.city, &self.region, &self.postal_code, &self.country]
      .into_iter()
      .filter(|part| !part.trim().is_empty())
      .map(String::as_str)
      .collect::<Vec<_>>()
      .join(", ")
  }
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id: String,
  pub name: String,
  pub email: String,
  #[serde(default)]
  pub phone: String,
  /// Stored and compared as entered; this store is not an auth system.
  pub password: String,
  #[serde(default)]
  pub role: Role,
  #[serde(default)]
  pub addresses: Vec<Address>,
  #[serde(default)]
  pub preferences: Preferences,
  pub created_at: DateTime<Utc>,
}

impl User {
  /// The address flagged default, falling back to the first one.
  pub fn default_address(&self) -> Option<&Address> {
    self
      .addresses
      .iter()
      .find(|a| a.is_default)
      .or_else(|| self.addresses.first())
  }

  pub fn is_admin(&self) -> bool {
    self.role == Role::Admin
  }

  pub fn snapshot(&self) -> CustomerSnapshot {
    CustomerSnapshot {
      name: self.name.clone(),
      email: self.email.clone(),
      phone: self.phone.clone(),
    }
  }
}

impl fmt::Debug for User {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("User")
      .field("id", &self.id)
      .field("name", &self.name)
      .field("email", &self.email)
      .field("phone", &self.phone)
      .field("password", &"[REDACTED]")
      .field("role", &self.role)
      .field("addresses", &self.addresses)
      .field("preferences", &self.preferences)
      .field("created_at", &self.created_at)
      .finish()
  }
}
