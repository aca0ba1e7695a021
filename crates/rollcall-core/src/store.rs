//! The `AttendanceStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `rollcall-store-sqlite`).
//! The web layer depends on this abstraction and receives a store handle
//! explicitly through its application state.

use std::future::Future;

use chrono::{DateTime, NaiveDate, Utc};

use crate::{
  attendance::{AttendanceRecord, AttendanceStatus, DeleteOutcome, Mark, MarkOutcome},
  subject::{Subject, SubjectId, SubjectName},
  user::{NewUser, User, UserId},
};

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Rollcall storage backend.
///
/// Every method that changes more than one row commits as a single unit: a
/// caller never observes a counter update without its ledger entry, or a
/// deleted subject that still has ledger entries.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait AttendanceStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Persist a new account. Fails if the e-mail is already registered.
  fn create_user(
    &self,
    user: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    id: UserId,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn find_user_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  // ── Sessions ──────────────────────────────────────────────────────────

  /// Record a login session keyed by the digest of its cookie token.
  fn open_session(
    &self,
    user_id: UserId,
    token_digest: String,
    expires_at: DateTime<Utc>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Resolve a session digest to its user, ignoring sessions that expired
  /// before `now`.
  fn session_user<'a>(
    &'a self,
    token_digest: &'a str,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<Option<UserId>, Self::Error>> + Send + 'a;

  /// Remove a session. Closing an unknown session is not an error.
  fn close_session<'a>(
    &'a self,
    token_digest: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  // ── Subjects ──────────────────────────────────────────────────────────

  /// Create a subject owned by `owner` with both counters at zero.
  fn add_subject(
    &self,
    owner: UserId,
    name: SubjectName,
  ) -> impl Future<Output = Result<Subject, Self::Error>> + Send + '_;

  fn get_subject(
    &self,
    id: SubjectId,
  ) -> impl Future<Output = Result<Option<Subject>, Self::Error>> + Send + '_;

  /// All subjects owned by `owner`, in creation order.
  fn list_subjects(
    &self,
    owner: UserId,
  ) -> impl Future<Output = Result<Vec<Subject>, Self::Error>> + Send + '_;

  /// Delete a subject and its ledger entries if `caller` owns it.
  fn delete_subject(
    &self,
    caller: UserId,
    id: SubjectId,
  ) -> impl Future<Output = Result<DeleteOutcome, Self::Error>> + Send + '_;

  // ── Marking ───────────────────────────────────────────────────────────

  /// Ledger-mode mark: weighted, accepted at most once per subject per
  /// `day`. Ownership is not checked.
  fn mark_once_per_day(
    &self,
    mark: Mark,
    day: NaiveDate,
  ) -> impl Future<Output = Result<MarkOutcome, Self::Error>> + Send + '_;

  /// Simple-mode mark: weight 1, no daily guard, only the owner may mark.
  fn mark_owned(
    &self,
    caller: UserId,
    id: SubjectId,
    status: AttendanceStatus,
  ) -> impl Future<Output = Result<MarkOutcome, Self::Error>> + Send + '_;

  // ── Ledger reads ──────────────────────────────────────────────────────

  /// Ids of every subject with a ledger entry on `day`, across all users.
  fn marked_on(
    &self,
    day: NaiveDate,
  ) -> impl Future<Output = Result<Vec<SubjectId>, Self::Error>> + Send + '_;

  /// Ledger entries for one subject, oldest first.
  fn list_records(
    &self,
    id: SubjectId,
  ) -> impl Future<Output = Result<Vec<AttendanceRecord>, Self::Error>> + Send + '_;
}
