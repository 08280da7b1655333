// glowcart/src/session.rs

use parking_lot::RwLock;

use crate::models::User;

/// The signed-in user, as seen by the managers.
pub trait SessionProvider: Send + Sync {
  fn current_user(&self) -> Option<User>;

  fn sign_in(&self, user: User);

  fn sign_out(&self);
}

/// In-process session holding a copy of the signed-in user record.
#[derive(Debug, Default)]
pub struct Session {
  user: RwLock<Option<User>>,
}

impl Session {
  pub fn new() -> Self {
    Self::default()
  }
}

impl SessionProvider for Session {
  fn current_user(&self) -> Option<User> {
    self.user.read().clone()
  }

  fn sign_in(&self, user: User) {
    *self.user.write() = Some(user);
  }

  fn sign_out(&self) {
    *self.user.write() = None;
  }
}
