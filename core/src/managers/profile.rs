// glowcart/src/managers/profile.rs

//! Accounts, the signed-in session and per-user addresses and preferences.

use chrono::Utc;
use tracing::{event, instrument, Level};

use crate::context::ShopContext;
use crate::error::{ShopError, ShopResult};
use crate::events::ShopEvent;
use crate::managers::orders::OrderManager;
use crate::models::{new_id, Address, Order, Preferences, Role, User};
use crate::notify::Severity;
use crate::store::Collection;

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Default)]
pub struct NewUser {
  pub name: String,
  pub email: String,
  pub phone: String,
  pub password: String,
}

/// Partial profile edit. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
  pub name: Option<String>,
  pub email: Option<String>,
  pub phone: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AddressInput {
  pub label: String,
  pub recipient: String,
  pub street: String,
  pub city: String,
  pub region: String,
  pub postal_code: String,
  pub country: String,
  pub phone: String,
  pub make_default: bool,
}

fn looks_like_email(email: &str) -> bool {
  match email.split_once('@') {
    Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.'),
    None => false,
  }
}

fn validate_email(email: &str) -> ShopResult<String> {
  let email = email.trim().to_lowercase();
  if !looks_like_email(&email) {
    return Err(ShopError::validation(format!("'{}' is not a valid email address", email)));
  }
  Ok(email)
}

#[derive(Clone)]
pub struct ProfileManager {
  ctx: ShopContext,
}

impl ProfileManager {
  pub fn new(ctx: ShopContext) -> Self {
    Self { ctx }
  }

  pub fn users(&self) -> Vec<User> {
    self.ctx.storage.load_or_empty(Collection::Users)
  }

  pub fn current_user(&self) -> Option<User> {
    self.ctx.session.current_user()
  }

  fn create(&self, input: NewUser, role: Role) -> ShopResult<User> {
    let name = input.name.trim().to_string();
    if name.is_empty() {
      return Err(ShopError::validation("Name is required"));
    }
    let email = validate_email(&input.email)?;
    if input.password.chars().count() < MIN_PASSWORD_LEN {
      return Err(ShopError::validation(format!(
        "Password must be at least {} characters",
        MIN_PASSWORD_LEN
      )));
    }
    let mut users: Vec<User> = self.ctx.storage.load(Collection::Users)?;
    if users.iter().any(|u| u.email.eq_ignore_ascii_case(&email)) {
      return Err(ShopError::validation(format!("An account already exists for {}", email)));
    }
    let user = User {
      id: new_id("usr"),
      name,
      email,
      phone: input.phone.trim().to_string(),
      password: input.password,
      role,
      addresses: Vec::new(),
      preferences: Preferences::default(),
      created_at: Utc::now(),
    };
    users.push(user.clone());
    self.ctx.storage.save(Collection::Users, &users)?;
    event!(Level::INFO, user_id = %user.id, role = ?user.role, "Account created.");
    Ok(user)
  }

  /// Creates a customer account. Does not sign it in.
  #[instrument(name = "ProfileManager::register", skip_all)]
  pub fn register(&self, input: NewUser) -> ShopResult<User> {
    let result = self.create(input, Role::Customer);
    if let Ok(user) = &result {
      self
        .ctx
        .notify(&format!("Welcome, {}!", user.name), Severity::Success);
    }
    self.ctx.reported(result)
  }

  /// Creates an admin account unless one already exists. Returns `None` when
  /// an admin was already present.
  pub fn bootstrap_admin(&self, input: NewUser) -> ShopResult<Option<User>> {
    let users: Vec<User> = self.ctx.storage.load(Collection::Users)?;
    if users.iter().any(User::is_admin) {
      return Ok(None);
    }
    self.create(input, Role::Admin).map(Some)
  }

  #[instrument(name = "ProfileManager::login", skip(self, password))]
  pub fn login(&self, email: &str, password: &str) -> ShopResult<User> {
    let email = email.trim().to_lowercase();
    let found = self
      .users()
      .into_iter()
      .find(|u| u.email.eq_ignore_ascii_case(&email) && u.password == password);
    let result = found.ok_or_else(|| ShopError::validation("Invalid email or password"));
    let user = self.ctx.reported(result)?;
    self.ctx.session.sign_in(user.clone());
    self.ctx.publish(ShopEvent::SessionChanged {
      user_id: Some(user.id.clone()),
    });
    self
      .ctx
      .notify(&format!("Signed in as {}", user.name), Severity::Info);
    Ok(user)
  }

  pub fn logout(&self) {
    if self.ctx.session.current_user().is_some() {
      self.ctx.session.sign_out();
      self.ctx.publish(ShopEvent::SessionChanged { user_id: None });
    }
  }

  /// Applies `edit` to the signed-in user, saves it and refreshes the
  /// session copy.
  fn mutate_current<F>(&self, edit: F) -> ShopResult<User>
  where
    F: FnOnce(&mut User, &[User]) -> ShopResult<()>,
  {
    let current = self.ctx.require_user()?;
    let mut users: Vec<User> = self.ctx.storage.load(Collection::Users)?;
    let idx = users
      .iter()
      .position(|u| u.id == current.id)
      .ok_or_else(|| ShopError::not_found("User", &current.id))?;
    let mut user = users[idx].clone();
    edit(&mut user, &users)?;
    users[idx] = user.clone();
    self.ctx.storage.save(Collection::Users, &users)?;
    self.ctx.session.sign_in(user.clone());
    self.ctx.publish(ShopEvent::ProfileChanged {
      user_id: user.id.clone(),
    });
    Ok(user)
  }

  pub fn update_profile(&self, update: ProfileUpdate) -> ShopResult<User> {
    let result = self.mutate_current(|user, all| {
      if let Some(name) = update.name {
        let name = name.trim().to_string();
        if name.is_empty() {
          return Err(ShopError::validation("Name is required"));
        }
        user.name = name;
      }
      if let Some(email) = update.email {
        let email = validate_email(&email)?;
        if all.iter().any(|u| u.id != user.id && u.email.eq_ignore_ascii_case(&email)) {
          return Err(ShopError::validation(format!("An account already exists for {}", email)));
        }
        user.email = email;
      }
      if let Some(phone) = update.phone {
        user.phone = phone.trim().to_string();
      }
      Ok(())
    });
    if result.is_ok() {
      self.ctx.notify("Profile updated", Severity::Success);
    }
    self.ctx.reported(result)
  }

  /// Adds an address. The first address a user saves becomes the default.
  pub fn add_address(&self, input: AddressInput) -> ShopResult<Address> {
    let result = self.mutate_current(|user, _| {
      if input.street.trim().is_empty() || input.city.trim().is_empty() {
        return Err(ShopError::validation("Street and city are required"));
      }
      let is_default = input.make_default || user.addresses.is_empty();
      if is_default {
        user.addresses.iter_mut().for_each(|a| a.is_default = false);
      }
      user.addresses.push(Address {
        id: new_id("adr"),
        label: input.label,
        recipient: if input.recipient.trim().is_empty() {
          user.name.clone()
        } else {
          input.recipient
        },
        street: input.street,
        city: input.city,
        region: input.region,
        postal_code: input.postal_code,
        country: input.country,
        phone: input.phone,
        is_default,
      });
      Ok(())
    });
    self
      .ctx
      .reported(result)
      .and_then(|user| user.addresses.last().cloned().ok_or_else(|| ShopError::not_found("Address", "new")))
  }

  pub fn set_default_address(&self, address_id: &str) -> ShopResult<User> {
    let result = self.mutate_current(|user, _| {
      if !user.addresses.iter().any(|a| a.id == address_id) {
        return Err(ShopError::not_found("Address", address_id));
      }
      for address in &mut user.addresses {
        address.is_default = address.id == address_id;
      }
      Ok(())
    });
    self.ctx.reported(result)
  }

  /// Removes an address; if it was the default the first remaining one takes
  /// over.
  pub fn remove_address(&self, address_id: &str) -> ShopResult<User> {
    let result = self.mutate_current(|user, _| {
      let idx = user
        .addresses
        .iter()
        .position(|a| a.id == address_id)
        .ok_or_else(|| ShopError::not_found("Address", address_id))?;
      let removed = user.addresses.remove(idx);
      if removed.is_default {
        if let Some(first) = user.addresses.first_mut() {
          first.is_default = true;
        }
      }
      Ok(())
    });
    self.ctx.reported(result)
  }

  pub fn update_preferences(&self, preferences: Preferences) -> ShopResult<User> {
    let result = self.mutate_current(|user, _| {
      user.preferences = preferences;
      Ok(())
    });
    self.ctx.reported(result)
  }

  /// The signed-in user's orders, newest first.
  pub fn order_history(&self) -> ShopResult<Vec<Order>> {
    let user = self.ctx.reported(self.ctx.require_user())?;
    Ok(OrderManager::new(self.ctx.clone()).for_user(&user.id))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn email_shape() {
    assert!(looks_like_email("amal@example.ma"));
    assert!(!looks_like_email("amal.example.ma"));
    assert!(!looks_like_email("@example.ma"));
    assert!(!looks_like_email("amal@localhost"));
    assert!(!looks_like_email("amal@example."));
  }
}
