//! URL-encoded form bodies and their validation.
//!
//! Every field defaults to empty so a missing field reaches validation
//! instead of failing extraction.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::error::Error;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("invalid e-mail pattern")
});

pub fn is_valid_email(email: &str) -> bool { EMAIL_RE.is_match(email) }

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
  pub name:             String,
  pub gmail:            String,
  pub password:         String,
  pub confirm_password: String,
}

impl RegisterForm {
  pub fn validate(&self) -> Result<(), Error> {
    if self.name.trim().is_empty() {
      return Err(Error::BadRequest("name is required".into()));
    }
    if self.gmail.is_empty() {
      return Err(Error::BadRequest("gmail is required".into()));
    }
    if !is_valid_email(&self.gmail) {
      return Err(Error::BadRequest("gmail must be a valid e-mail address".into()));
    }
    if self.password.is_empty() {
      return Err(Error::BadRequest("password is required".into()));
    }
    if self.confirm_password != self.password {
      return Err(Error::BadRequest("passwords must match".into()));
    }
    Ok(())
  }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
  pub gmail:    String,
  pub password: String,
}

impl LoginForm {
  pub fn validate(&self) -> Result<(), Error> {
    if !is_valid_email(&self.gmail) {
      return Err(Error::BadRequest("gmail must be a valid e-mail address".into()));
    }
    if self.password.is_empty() {
      return Err(Error::BadRequest("password is required".into()));
    }
    Ok(())
  }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddSubjectForm {
  pub sub_name: String,
}
