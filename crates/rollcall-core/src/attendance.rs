//! Attendance accounting: statuses, session weights, counters, the daily
//! ledger, and the outcomes of every mutating operation.
//!
//! Two marking modes exist. In [`MarkingMode::Ledger`] a mark is weighted by
//! session type and accepted at most once per subject per day; in
//! [`MarkingMode::Simple`] every mark counts once and only the subject's owner
//! may mark it.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  subject::{Subject, SubjectId},
};

// ─── Status ──────────────────────────────────────────────────────────────────

/// The status string attached to a mark.
///
/// Any non-empty string is accepted; only an exact `present` counts towards
/// `present_count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttendanceStatus(String);

impl AttendanceStatus {
  pub const PRESENT: &'static str = "present";

  pub fn parse(raw: &str) -> Result<Self> {
    if raw.is_empty() {
      return Err(Error::Empty("status"));
    }
    Ok(Self(raw.to_owned()))
  }

  pub fn present() -> Self { Self(Self::PRESENT.to_owned()) }

  pub fn is_present(&self) -> bool { self.0 == Self::PRESENT }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for AttendanceStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

// ─── Session type ────────────────────────────────────────────────────────────

/// Weight of every mark in [`MarkingMode::Simple`].
pub const UNWEIGHTED: u32 = 1;

/// The kind of class being marked. Determines the weight of a ledger mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
  #[default]
  Normal,
  Lab,
  Extra,
}

impl SessionType {
  /// Resolve a path segment. Unrecognised values count as a normal class.
  pub fn parse(raw: &str) -> Self {
    match raw {
      "lab" => Self::Lab,
      "extra" => Self::Extra,
      _ => Self::Normal,
    }
  }

  /// Counter increment for one mark of this session type.
  ///
  /// Extra sessions weigh the same as normal ones.
  pub fn weight(self) -> u32 {
    match self {
      Self::Lab => 2,
      Self::Extra => 1,
      Self::Normal => 1,
    }
  }
}

// ─── Counters ────────────────────────────────────────────────────────────────

/// The `(present, total)` counter pair of a subject.
///
/// `present <= total` holds for every value of this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tally {
  present: u32,
  total:   u32,
}

impl Tally {
  pub fn new(present: u32, total: u32) -> Result<Self> {
    if present > total {
      return Err(Error::InvalidTally { present, total });
    }
    Ok(Self { present, total })
  }

  pub fn present(&self) -> u32 { self.present }

  pub fn total(&self) -> u32 { self.total }

  /// Apply one mark: the total always grows by `weight`, the present count
  /// only when `status` is present.
  pub fn record(self, status: &AttendanceStatus, weight: u32) -> Result<Self> {
    let overflow = || Error::CounterOverflow { total: self.total, weight };
    let total = self.total.checked_add(weight).ok_or_else(overflow)?;
    let present = if status.is_present() {
      self.present.checked_add(weight).ok_or_else(overflow)?
    } else {
      self.present
    };
    Ok(Self { present, total })
  }

  pub fn percentage(&self) -> Option<f64> {
    if self.total == 0 {
      return None;
    }
    Some(f64::from(self.present) / f64::from(self.total) * 100.0)
  }
}

// ─── Ledger ──────────────────────────────────────────────────────────────────

/// Store-assigned ledger entry identifier.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RecordId(pub i64);

/// One accepted mark. At most one exists per `(subject_id, date_marked)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
  pub record_id:   RecordId,
  pub subject_id:  SubjectId,
  pub date_marked: NaiveDate,
  pub status:      AttendanceStatus,
}

/// Input for a ledger-mode mark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mark {
  pub subject_id: SubjectId,
  pub status:     AttendanceStatus,
  pub session:    SessionType,
}

impl Mark {
  pub fn weight(&self) -> u32 { self.session.weight() }
}

// ─── Mode ────────────────────────────────────────────────────────────────────

/// Which marking rules the server applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkingMode {
  /// Weighted, once per subject per day, no ownership check, deletable
  /// subjects.
  #[default]
  Ledger,
  /// Unweighted, owner-only, no daily guard.
  Simple,
}

impl MarkingMode {
  pub fn has_ledger(self) -> bool { matches!(self, Self::Ledger) }
}

// ─── Outcomes ────────────────────────────────────────────────────────────────

/// Result of a marking call. Only `Applied` changed anything.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkOutcome {
  Applied { subject: Subject, weight: u32 },
  AlreadyMarked,
  NotFound,
  NotOwned,
}

impl MarkOutcome {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Applied { .. } => "applied",
      Self::AlreadyMarked => "already_marked",
      Self::NotFound => "not_found",
      Self::NotOwned => "not_owned",
    }
  }
}

/// Result of a subject deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
  Deleted { records_removed: usize },
  NotFound,
  NotOwned,
}

impl DeleteOutcome {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Deleted { .. } => "deleted",
      Self::NotFound => "not_found",
      Self::NotOwned => "not_owned",
    }
  }
}

/// Result of a subject creation request. A blank name is skipped, not an
/// error.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
  Created(Subject),
  Skipped,
}

impl CreateOutcome {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Created(_) => "created",
      Self::Skipped => "skipped",
    }
  }
}
