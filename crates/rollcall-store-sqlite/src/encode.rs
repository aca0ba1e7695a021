//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings and calendar days as
//! `YYYY-MM-DD`. Ids are SQLite integer row ids.

use chrono::{DateTime, NaiveDate, Utc};
use rollcall_core::{
  attendance::{AttendanceRecord, AttendanceStatus, RecordId},
  subject::{Subject, SubjectId},
  user::{User, UserId},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DAY_FORMAT: &str = "%Y-%m-%d";

pub fn encode_day(day: NaiveDate) -> String { day.format(DAY_FORMAT).to_string() }

pub fn decode_day(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DAY_FORMAT).map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const USER_COLUMNS: &str = "user_id, name, email, password_hash, created_at";

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub user_id:       i64,
  pub name:          String,
  pub email:         String,
  pub password_hash: String,
  pub created_at:    String,
}

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:       row.get(0)?,
      name:          row.get(1)?,
      email:         row.get(2)?,
      password_hash: row.get(3)?,
      created_at:    row.get(4)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:       UserId(self.user_id),
      name:          self.name,
      email:         self.email,
      password_hash: self.password_hash,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

pub const SUBJECT_COLUMNS: &str =
  "subject_id, user_id, name, present_count, total_classes, created_at";

/// Raw values read directly from a `subjects` row.
#[derive(Debug, Clone)]
pub struct RawSubject {
  pub subject_id:    i64,
  pub user_id:       i64,
  pub name:          String,
  pub present_count: u32,
  pub total_classes: u32,
  pub created_at:    String,
}

impl RawSubject {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      subject_id:    row.get(0)?,
      user_id:       row.get(1)?,
      name:          row.get(2)?,
      present_count: row.get(3)?,
      total_classes: row.get(4)?,
      created_at:    row.get(5)?,
    })
  }

  pub fn into_subject(self) -> Result<Subject> {
    Ok(Subject {
      subject_id:    SubjectId(self.subject_id),
      user_id:       UserId(self.user_id),
      name:          self.name,
      present_count: self.present_count,
      total_classes: self.total_classes,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from an `attendance_records` row.
pub struct RawRecord {
  pub record_id:   i64,
  pub subject_id:  i64,
  pub date_marked: String,
  pub status:      String,
}

impl RawRecord {
  pub fn into_record(self) -> Result<AttendanceRecord> {
    Ok(AttendanceRecord {
      record_id:   RecordId(self.record_id),
      subject_id:  SubjectId(self.subject_id),
      date_marked: decode_day(&self.date_marked)?,
      status:      AttendanceStatus::parse(&self.status)?,
    })
  }
}
