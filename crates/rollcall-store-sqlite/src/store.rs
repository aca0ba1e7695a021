//! The SQLite implementation of [`AttendanceStore`].

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::OptionalExtension as _;

use rollcall_core::{
  attendance::{
    AttendanceRecord, AttendanceStatus, DeleteOutcome, Mark, MarkOutcome, Tally, UNWEIGHTED,
  },
  store::AttendanceStore,
  subject::{Subject, SubjectId, SubjectName},
  user::{NewUser, User, UserId},
};

use crate::{
  Result,
  encode::{
    RawRecord, RawSubject, RawUser, SUBJECT_COLUMNS, USER_COLUMNS, decode_dt, encode_day,
    encode_dt,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Rollcall store backed by a single SQLite file. Clones share one
/// connection thread.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open a fresh in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Transaction helpers ─────────────────────────────────────────────────────

/// What a marking transaction decided, before the subject row is decoded.
enum RawMark {
  Applied(RawSubject, u32),
  AlreadyMarked,
  NotFound,
  NotOwned,
}

impl RawMark {
  fn into_outcome(self) -> Result<MarkOutcome> {
    Ok(match self {
      RawMark::Applied(raw, weight) => MarkOutcome::Applied { subject: raw.into_subject()?, weight },
      RawMark::AlreadyMarked => MarkOutcome::AlreadyMarked,
      RawMark::NotFound => MarkOutcome::NotFound,
      RawMark::NotOwned => MarkOutcome::NotOwned,
    })
  }
}

fn select_subject(
  conn: &rusqlite::Connection,
  subject_id: i64,
) -> rusqlite::Result<Option<RawSubject>> {
  conn
    .query_row(
      &format!("SELECT {SUBJECT_COLUMNS} FROM subjects WHERE subject_id = ?1"),
      rusqlite::params![subject_id],
      RawSubject::from_row,
    )
    .optional()
}

/// Apply one mark to a subject's counters inside `tx` and return the
/// updated row.
fn apply_mark(
  tx: &rusqlite::Transaction<'_>,
  raw: RawSubject,
  status: &AttendanceStatus,
  weight: u32,
) -> tokio_rusqlite::Result<RawSubject> {
  let tally = Tally::new(raw.present_count, raw.total_classes)
    .and_then(|t| t.record(status, weight))
    .map_err(|e| tokio_rusqlite::Error::Other(Box::new(e)))?;

  tx.execute(
    "UPDATE subjects SET present_count = ?1, total_classes = ?2 WHERE subject_id = ?3",
    rusqlite::params![tally.present(), tally.total(), raw.subject_id],
  )?;

  Ok(RawSubject {
    present_count: tally.present(),
    total_classes: tally.total(),
    ..raw
  })
}

// ─── AttendanceStore impl ────────────────────────────────────────────────────

impl AttendanceStore for SqliteStore {
  type Error = crate::Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<User> {
    let created_at = Utc::now();
    let name = input.name().to_owned();
    let email = input.email().to_owned();
    let password_hash = input.password_hash().to_owned();
    let at_str = encode_dt(created_at);

    let (name_c, email_c, hash_c) = (name.clone(), email.clone(), password_hash.clone());
    let user_id: i64 = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (name, email, password_hash, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![name_c, email_c, hash_c, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(User {
      user_id: UserId(user_id),
      name,
      email,
      password_hash,
      created_at,
    })
  }

  async fn get_user(&self, id: UserId) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"),
              rusqlite::params![id.0],
              RawUser::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
    let email = email.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
              rusqlite::params![email],
              RawUser::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  // ── Sessions ──────────────────────────────────────────────────────────────

  async fn open_session(
    &self,
    user_id: UserId,
    token_digest: String,
    expires_at: DateTime<Utc>,
  ) -> Result<()> {
    let created_str = encode_dt(Utc::now());
    let expires_str = encode_dt(expires_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO sessions (token_digest, user_id, created_at, expires_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![token_digest, user_id.0, created_str, expires_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn session_user(&self, token_digest: &str, now: DateTime<Utc>) -> Result<Option<UserId>> {
    let digest = token_digest.to_owned();

    let row: Option<(i64, String)> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id, expires_at FROM sessions WHERE token_digest = ?1",
              rusqlite::params![digest],
              |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .optional()?,
        )
      })
      .await?;

    let Some((user_id, expires_at)) = row else {
      return Ok(None);
    };
    if decode_dt(&expires_at)? <= now {
      return Ok(None);
    }
    Ok(Some(UserId(user_id)))
  }

  async fn close_session(&self, token_digest: &str) -> Result<()> {
    let digest = token_digest.to_owned();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM sessions WHERE token_digest = ?1",
          rusqlite::params![digest],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Subjects ──────────────────────────────────────────────────────────────

  async fn add_subject(&self, owner: UserId, name: SubjectName) -> Result<Subject> {
    let created_at = Utc::now();
    let at_str = encode_dt(created_at);
    let name = name.into_inner();
    let name_c = name.clone();

    let subject_id: i64 = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO subjects (user_id, name, present_count, total_classes, created_at)
           VALUES (?1, ?2, 0, 0, ?3)",
          rusqlite::params![owner.0, name_c, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Subject {
      subject_id: SubjectId(subject_id),
      user_id: owner,
      name,
      present_count: 0,
      total_classes: 0,
      created_at,
    })
  }

  async fn get_subject(&self, id: SubjectId) -> Result<Option<Subject>> {
    let raw: Option<RawSubject> = self
      .conn
      .call(move |conn| Ok(select_subject(conn, id.0)?))
      .await?;

    raw.map(RawSubject::into_subject).transpose()
  }

  async fn list_subjects(&self, owner: UserId) -> Result<Vec<Subject>> {
    let raws: Vec<RawSubject> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {SUBJECT_COLUMNS} FROM subjects WHERE user_id = ?1 ORDER BY subject_id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![owner.0], RawSubject::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSubject::into_subject).collect()
  }

  async fn delete_subject(&self, caller: UserId, id: SubjectId) -> Result<DeleteOutcome> {
    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let owner: Option<i64> = tx
          .query_row(
            "SELECT user_id FROM subjects WHERE subject_id = ?1",
            rusqlite::params![id.0],
            |r| r.get(0),
          )
          .optional()?;

        match owner {
          None => Ok(DeleteOutcome::NotFound),
          Some(owner) if owner != caller.0 => Ok(DeleteOutcome::NotOwned),
          Some(_) => {
            // Ledger rows first; the foreign key forbids the reverse order.
            let records_removed = tx.execute(
              "DELETE FROM attendance_records WHERE subject_id = ?1",
              rusqlite::params![id.0],
            )?;
            tx.execute(
              "DELETE FROM subjects WHERE subject_id = ?1",
              rusqlite::params![id.0],
            )?;
            tx.commit()?;
            Ok(DeleteOutcome::Deleted { records_removed })
          }
        }
      })
      .await?;

    Ok(outcome)
  }

  // ── Marking ───────────────────────────────────────────────────────────────

  async fn mark_once_per_day(&self, mark: Mark, day: NaiveDate) -> Result<MarkOutcome> {
    let day_str = encode_day(day);
    let weight = mark.weight();
    let Mark { subject_id, status, .. } = mark;

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let Some(subject) = select_subject(&tx, subject_id.0)? else {
          return Ok(RawMark::NotFound);
        };

        // The unique (subject_id, date_marked) key makes the daily check and
        // the ledger write one statement.
        let inserted = tx.execute(
          "INSERT INTO attendance_records (subject_id, date_marked, status)
           VALUES (?1, ?2, ?3)
           ON CONFLICT (subject_id, date_marked) DO NOTHING",
          rusqlite::params![subject_id.0, day_str, status.as_str()],
        )?;
        if inserted == 0 {
          return Ok(RawMark::AlreadyMarked);
        }

        let updated = apply_mark(&tx, subject, &status, weight)?;
        tx.commit()?;
        Ok(RawMark::Applied(updated, weight))
      })
      .await?;

    raw.into_outcome()
  }

  async fn mark_owned(
    &self,
    caller: UserId,
    id: SubjectId,
    status: AttendanceStatus,
  ) -> Result<MarkOutcome> {
    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let Some(subject) = select_subject(&tx, id.0)? else {
          return Ok(RawMark::NotFound);
        };
        if subject.user_id != caller.0 {
          return Ok(RawMark::NotOwned);
        }

        let updated = apply_mark(&tx, subject, &status, UNWEIGHTED)?;
        tx.commit()?;
        Ok(RawMark::Applied(updated, UNWEIGHTED))
      })
      .await?;

    raw.into_outcome()
  }

  // ── Ledger reads ──────────────────────────────────────────────────────────

  async fn marked_on(&self, day: NaiveDate) -> Result<Vec<SubjectId>> {
    let day_str = encode_day(day);

    let ids: Vec<i64> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT DISTINCT subject_id FROM attendance_records
           WHERE date_marked = ?1
           ORDER BY subject_id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![day_str], |r| r.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(ids.into_iter().map(SubjectId).collect())
  }

  async fn list_records(&self, id: SubjectId) -> Result<Vec<AttendanceRecord>> {
    let raws: Vec<RawRecord> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT record_id, subject_id, date_marked, status
           FROM attendance_records
           WHERE subject_id = ?1
           ORDER BY date_marked, record_id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id.0], |row| {
            Ok(RawRecord {
              record_id:   row.get(0)?,
              subject_id:  row.get(1)?,
              date_marked: row.get(2)?,
              status:      row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRecord::into_record).collect()
  }
}
