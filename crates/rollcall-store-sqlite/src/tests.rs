//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{Duration, NaiveDate, Utc};
use rollcall_core::{
  attendance::{AttendanceStatus, DeleteOutcome, Mark, MarkOutcome, SessionType},
  store::AttendanceStore,
  subject::{Subject, SubjectId, SubjectName},
  user::{NewUser, User, UserId},
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn user(s: &SqliteStore, email: &str) -> User {
  s.create_user(NewUser::new("Arya", email, "$argon2id$stub").unwrap())
    .await
    .unwrap()
}

async fn subject(s: &SqliteStore, owner: UserId, name: &str) -> Subject {
  s.add_subject(owner, SubjectName::parse(name).unwrap())
    .await
    .unwrap()
}

fn day(d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(2024, 9, d).unwrap() }

fn mark(id: SubjectId, status: &str, session: &str) -> Mark {
  Mark {
    subject_id: id,
    status:     AttendanceStatus::parse(status).unwrap(),
    session:    SessionType::parse(session),
  }
}

fn counters(outcome: &MarkOutcome) -> (u32, u32) {
  match outcome {
    MarkOutcome::Applied { subject, .. } => (subject.present_count, subject.total_classes),
    other => panic!("expected Applied, got {other:?}"),
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_find_user() {
  let s = store().await;
  let created = user(&s, "Arya@Example.com").await;
  assert_eq!(created.email, "Arya@Example.com");

  let by_email = s.find_user_by_email("Arya@Example.com").await.unwrap().unwrap();
  assert_eq!(by_email.user_id, created.user_id);
  assert!(s.find_user_by_email("arya@example.com").await.unwrap().is_none());

  let by_id = s.get_user(created.user_id).await.unwrap().unwrap();
  assert_eq!(by_id.name, "Arya");
  assert_eq!(by_id.password_hash, "$argon2id$stub");
}

#[tokio::test]
async fn unknown_user_is_none() {
  let s = store().await;
  assert!(s.find_user_by_email("nobody@example.com").await.unwrap().is_none());
  assert!(s.get_user(UserId(42)).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_email_is_a_database_error() {
  let s = store().await;
  user(&s, "dup@example.com").await;
  let err = s
    .create_user(NewUser::new("Other", "dup@example.com", "h").unwrap())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Database(_)), "{err}");
}

#[tokio::test]
async fn emails_differing_in_case_are_distinct_accounts() {
  let s = store().await;
  let lower = user(&s, "arya@example.com").await;
  let upper = user(&s, "ARYA@example.com").await;
  assert_ne!(lower.user_id, upper.user_id);

  let found = s.find_user_by_email("ARYA@example.com").await.unwrap().unwrap();
  assert_eq!(found.user_id, upper.user_id);
}

// ─── Sessions ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn session_lifecycle() {
  let s = store().await;
  let u = user(&s, "a@example.com").await;
  let now = Utc::now();

  s.open_session(u.user_id, "digest-1".into(), now + Duration::hours(1))
    .await
    .unwrap();
  assert_eq!(s.session_user("digest-1", now).await.unwrap(), Some(u.user_id));
  assert_eq!(s.session_user("digest-2", now).await.unwrap(), None);

  s.close_session("digest-1").await.unwrap();
  assert_eq!(s.session_user("digest-1", now).await.unwrap(), None);

  // Closing twice is fine.
  s.close_session("digest-1").await.unwrap();
}

#[tokio::test]
async fn expired_session_is_ignored() {
  let s = store().await;
  let u = user(&s, "a@example.com").await;
  let now = Utc::now();

  s.open_session(u.user_id, "old".into(), now - Duration::minutes(1))
    .await
    .unwrap();
  assert_eq!(s.session_user("old", now).await.unwrap(), None);
}

// ─── Subjects ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_list_subjects_per_owner() {
  let s = store().await;
  let a = user(&s, "a@example.com").await;
  let b = user(&s, "b@example.com").await;

  let maths = subject(&s, a.user_id, "Maths").await;
  assert_eq!((maths.present_count, maths.total_classes), (0, 0));
  subject(&s, a.user_id, "Maths").await;
  subject(&s, b.user_id, "Art").await;

  let mine = s.list_subjects(a.user_id).await.unwrap();
  assert_eq!(mine.len(), 2);
  assert!(mine.iter().all(|x| x.name == "Maths" && x.user_id == a.user_id));
  assert_ne!(mine[0].subject_id, mine[1].subject_id);

  let fetched = s.get_subject(maths.subject_id).await.unwrap().unwrap();
  assert_eq!(fetched, Subject { created_at: fetched.created_at, ..maths });
}

// ─── Ledger-mode marking ─────────────────────────────────────────────────────

#[tokio::test]
async fn present_lab_counts_double() {
  let s = store().await;
  let u = user(&s, "a@example.com").await;
  let sub = subject(&s, u.user_id, "Chemistry").await;

  let out = s
    .mark_once_per_day(mark(sub.subject_id, "present", "lab"), day(2))
    .await
    .unwrap();
  assert_eq!(counters(&out), (2, 2));
  assert!(matches!(out, MarkOutcome::Applied { weight: 2, .. }));
}

#[tokio::test]
async fn second_mark_same_day_is_ignored() {
  let s = store().await;
  let u = user(&s, "a@example.com").await;
  let sub = subject(&s, u.user_id, "Chemistry").await;

  s.mark_once_per_day(mark(sub.subject_id, "present", "lab"), day(2))
    .await
    .unwrap();
  let again = s
    .mark_once_per_day(mark(sub.subject_id, "absent", "normal"), day(2))
    .await
    .unwrap();
  assert_eq!(again, MarkOutcome::AlreadyMarked);

  let after = s.get_subject(sub.subject_id).await.unwrap().unwrap();
  assert_eq!((after.present_count, after.total_classes), (2, 2));
  assert_eq!(s.list_records(sub.subject_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn next_day_applies_again() {
  let s = store().await;
  let u = user(&s, "a@example.com").await;
  let sub = subject(&s, u.user_id, "History").await;

  s.mark_once_per_day(mark(sub.subject_id, "present", "normal"), day(2))
    .await
    .unwrap();
  let out = s
    .mark_once_per_day(mark(sub.subject_id, "absent", "extra"), day(3))
    .await
    .unwrap();
  assert_eq!(counters(&out), (1, 2));

  let records = s.list_records(sub.subject_id).await.unwrap();
  assert_eq!(records.len(), 2);
  assert_eq!(records[0].date_marked, day(2));
  assert_eq!(records[1].status.as_str(), "absent");
}

#[tokio::test]
async fn ledger_mark_of_missing_subject_changes_nothing() {
  let s = store().await;
  let out = s
    .mark_once_per_day(mark(SubjectId(99), "present", "normal"), day(2))
    .await
    .unwrap();
  assert_eq!(out, MarkOutcome::NotFound);
  assert!(s.marked_on(day(2)).await.unwrap().is_empty());
}

#[tokio::test]
async fn ledger_mark_skips_ownership_check() {
  let s = store().await;
  let owner = user(&s, "owner@example.com").await;
  let sub = subject(&s, owner.user_id, "Biology").await;

  // No caller is even passed: any authenticated user can mark any id.
  let out = s
    .mark_once_per_day(mark(sub.subject_id, "present", "normal"), day(5))
    .await
    .unwrap();
  assert!(matches!(out, MarkOutcome::Applied { weight: 1, .. }));
}

#[tokio::test]
async fn long_status_is_recorded_and_counts_as_absent() {
  let s = store().await;
  let u = user(&s, "a@example.com").await;
  let sub = subject(&s, u.user_id, "Chemistry").await;

  let out = s
    .mark_once_per_day(mark(sub.subject_id, "not_present", "lab"), day(5))
    .await
    .unwrap();
  assert_eq!(counters(&out), (0, 2));

  let records = s.list_records(sub.subject_id).await.unwrap();
  assert_eq!(records[0].status.as_str(), "not_present");
}

#[tokio::test]
async fn subject_name_is_stored_as_typed() {
  let s = store().await;
  let u = user(&s, "a@example.com").await;
  let sub = subject(&s, u.user_id, "  ").await;

  let fetched = s.get_subject(sub.subject_id).await.unwrap().unwrap();
  assert_eq!(fetched.name, "  ");
}

#[tokio::test]
async fn marked_on_spans_all_users() {
  let s = store().await;
  let a = user(&s, "a@example.com").await;
  let b = user(&s, "b@example.com").await;
  let sa = subject(&s, a.user_id, "A").await;
  let sb = subject(&s, b.user_id, "B").await;
  let untouched = subject(&s, a.user_id, "C").await;

  s.mark_once_per_day(mark(sa.subject_id, "present", "normal"), day(7))
    .await
    .unwrap();
  s.mark_once_per_day(mark(sb.subject_id, "absent", "normal"), day(7))
    .await
    .unwrap();
  s.mark_once_per_day(mark(untouched.subject_id, "absent", "normal"), day(6))
    .await
    .unwrap();

  let today = s.marked_on(day(7)).await.unwrap();
  assert_eq!(today, vec![sa.subject_id, sb.subject_id]);
}

// ─── Simple-mode marking ─────────────────────────────────────────────────────

#[tokio::test]
async fn simple_mark_doubles_on_repeat() {
  let s = store().await;
  let u = user(&s, "a@example.com").await;
  let sub = subject(&s, u.user_id, "Maths").await;

  let first = s
    .mark_owned(u.user_id, sub.subject_id, AttendanceStatus::present())
    .await
    .unwrap();
  assert_eq!(counters(&first), (1, 1));

  let second = s
    .mark_owned(u.user_id, sub.subject_id, AttendanceStatus::present())
    .await
    .unwrap();
  assert_eq!(counters(&second), (2, 2));
  assert!(matches!(second, MarkOutcome::Applied { weight: 1, .. }));

  // Simple marks never touch the ledger.
  assert!(s.list_records(sub.subject_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn simple_mark_absent_only_grows_total() {
  let s = store().await;
  let u = user(&s, "a@example.com").await;
  let sub = subject(&s, u.user_id, "Maths").await;

  let out = s
    .mark_owned(u.user_id, sub.subject_id, AttendanceStatus::parse("absent").unwrap())
    .await
    .unwrap();
  assert_eq!(counters(&out), (0, 1));
}

#[tokio::test]
async fn simple_mark_rejects_foreign_subject() {
  let s = store().await;
  let owner = user(&s, "owner@example.com").await;
  let intruder = user(&s, "intruder@example.com").await;
  let sub = subject(&s, owner.user_id, "Maths").await;

  let out = s
    .mark_owned(intruder.user_id, sub.subject_id, AttendanceStatus::present())
    .await
    .unwrap();
  assert_eq!(out, MarkOutcome::NotOwned);

  let after = s.get_subject(sub.subject_id).await.unwrap().unwrap();
  assert_eq!((after.present_count, after.total_classes), (0, 0));

  let missing = s
    .mark_owned(owner.user_id, SubjectId(1234), AttendanceStatus::present())
    .await
    .unwrap();
  assert_eq!(missing, MarkOutcome::NotFound);
}

// ─── Deletion ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_removes_subject_and_records() {
  let s = store().await;
  let u = user(&s, "a@example.com").await;
  let sub = subject(&s, u.user_id, "Geography").await;
  let keep = subject(&s, u.user_id, "Music").await;

  for d in 1..=3 {
    s.mark_once_per_day(mark(sub.subject_id, "present", "normal"), day(d))
      .await
      .unwrap();
  }

  let out = s.delete_subject(u.user_id, sub.subject_id).await.unwrap();
  assert_eq!(out, DeleteOutcome::Deleted { records_removed: 3 });

  assert!(s.get_subject(sub.subject_id).await.unwrap().is_none());
  assert!(s.list_records(sub.subject_id).await.unwrap().is_empty());
  assert!(s.marked_on(day(3)).await.unwrap().is_empty());

  let left = s.list_subjects(u.user_id).await.unwrap();
  assert_eq!(left.iter().map(|x| x.subject_id).collect::<Vec<_>>(), vec![keep.subject_id]);

  // Ids are not reused after deletion.
  let next = subject(&s, u.user_id, "Geography").await;
  assert_ne!(next.subject_id, sub.subject_id);
}

#[tokio::test]
async fn delete_by_non_owner_or_missing_is_a_noop() {
  let s = store().await;
  let owner = user(&s, "owner@example.com").await;
  let other = user(&s, "other@example.com").await;
  let sub = subject(&s, owner.user_id, "Drama").await;
  s.mark_once_per_day(mark(sub.subject_id, "present", "normal"), day(1))
    .await
    .unwrap();

  let out = s.delete_subject(other.user_id, sub.subject_id).await.unwrap();
  assert_eq!(out, DeleteOutcome::NotOwned);
  assert!(s.get_subject(sub.subject_id).await.unwrap().is_some());
  assert_eq!(s.list_records(sub.subject_id).await.unwrap().len(), 1);

  let missing = s.delete_subject(owner.user_id, SubjectId(777)).await.unwrap();
  assert_eq!(missing, DeleteOutcome::NotFound);
}

// ─── Invariant ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn counters_never_invert_over_mixed_operations() {
  let s = store().await;
  let u = user(&s, "a@example.com").await;
  let sub = subject(&s, u.user_id, "Mixed").await;

  let plan = [
    ("present", "lab"),
    ("absent", "normal"),
    ("late", "extra"),
    ("present", "normal"),
    ("absent", "lab"),
  ];
  for (i, (status, session)) in plan.iter().enumerate() {
    s.mark_once_per_day(mark(sub.subject_id, status, session), day(i as u32 + 1))
      .await
      .unwrap();
    s.mark_owned(u.user_id, sub.subject_id, AttendanceStatus::parse(status).unwrap())
      .await
      .unwrap();

    let now = s.get_subject(sub.subject_id).await.unwrap().unwrap();
    assert!(now.present_count <= now.total_classes);
  }

  let end = s.get_subject(sub.subject_id).await.unwrap().unwrap();
  // Ledger marks give 3 of 7, simple marks 2 of 5.
  assert_eq!((end.present_count, end.total_classes), (5, 12));
}
