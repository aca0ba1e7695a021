//! Subjects: the per-user courses whose attendance is tracked.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, attendance::Tally, user::UserId};

/// Store-assigned subject identifier.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SubjectId(pub i64);

impl fmt::Display for SubjectId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

/// A non-empty subject name, kept exactly as typed. Duplicates across
/// subjects are allowed; subjects are told apart only by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectName(String);

impl SubjectName {
  pub fn parse(raw: &str) -> Result<Self> {
    if raw.is_empty() {
      return Err(Error::Empty("subject name"));
    }
    Ok(Self(raw.to_owned()))
  }

  pub fn as_str(&self) -> &str { &self.0 }

  pub fn into_inner(self) -> String { self.0 }
}

/// A tracked subject with its running counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
  pub subject_id:    SubjectId,
  pub user_id:       UserId,
  pub name:          String,
  pub present_count: u32,
  pub total_classes: u32,
  pub created_at:    DateTime<Utc>,
}

impl Subject {
  /// The counters as a [`Tally`]. Fails if `present_count` exceeds
  /// `total_classes`.
  pub fn tally(&self) -> Result<Tally> { Tally::new(self.present_count, self.total_classes) }

  /// Attendance percentage, or `None` before the first class.
  pub fn percentage(&self) -> Result<Option<f64>> { Ok(self.tally()?.percentage()) }
}
