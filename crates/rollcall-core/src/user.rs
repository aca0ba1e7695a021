//! User accounts: the owners of subjects.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Store-assigned user identifier.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub user_id:       UserId,
  pub name:          String,
  /// The unique contact handle used to log in.
  pub email:         String,
  /// argon2 PHC string; never leaves the server.
  #[serde(skip_serializing)]
  pub password_hash: String,
  pub created_at:    DateTime<Utc>,
}

/// Input for [`AttendanceStore::create_user`](crate::store::AttendanceStore::create_user).
///
/// The password must already be hashed; this crate never sees plaintext.
#[derive(Debug, Clone)]
pub struct NewUser {
  name:          String,
  email:         String,
  password_hash: String,
}

impl NewUser {
  /// Build a new account, trimming the name. The e-mail is kept exactly as
  /// given; addresses differing in case are distinct accounts.
  pub fn new(
    name: impl Into<String>,
    email: impl Into<String>,
    password_hash: impl Into<String>,
  ) -> Result<Self> {
    let name = name.into().trim().to_owned();
    let email = email.into();
    let password_hash = password_hash.into();

    if name.is_empty() {
      return Err(Error::Empty("name"));
    }
    if email.is_empty() {
      return Err(Error::Empty("email"));
    }
    if password_hash.is_empty() {
      return Err(Error::Empty("password hash"));
    }

    Ok(Self { name, email, password_hash })
  }

  pub fn name(&self) -> &str { &self.name }

  pub fn email(&self) -> &str { &self.email }

  pub fn password_hash(&self) -> &str { &self.password_hash }
}
