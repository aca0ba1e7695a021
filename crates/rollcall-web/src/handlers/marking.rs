//! `POST /mark/{sub_id}/{status}[/{session_type}]`
//!
//! The configured [`MarkingMode`] picks the rules:
//!
//! | Mode     | Weight          | Daily guard | Ownership check |
//! |----------|-----------------|-------------|-----------------|
//! | `ledger` | by session type | yes         | no              |
//! | `simple` | always 1        | no          | yes             |

use axum::{
  extract::{Path, State},
  response::Response,
};
use rollcall_core::{
  attendance::{AttendanceStatus, Mark, MarkOutcome, MarkingMode, SessionType},
  store::AttendanceStore,
};
use serde::Deserialize;

use super::{parse_sub_id, redirect_with_outcome};
use crate::{AppState, auth::CurrentUser, error::Error};

#[derive(Debug, Deserialize)]
pub struct MarkPath {
  pub sub_id:       String,
  pub status:       String,
  #[serde(default)]
  pub session_type: Option<String>,
}

pub async fn handler<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Path(path): Path<MarkPath>,
) -> Result<Response, Error>
where
  S: AttendanceStore + Clone + Send + Sync + 'static,
{
  let subject_id = parse_sub_id(&path.sub_id)?;
  let status = AttendanceStatus::parse(&path.status)?;

  let outcome = match state.config.marking_mode {
    MarkingMode::Ledger => {
      let session = path
        .session_type
        .as_deref()
        .map(SessionType::parse)
        .unwrap_or_default();
      let mark = Mark { subject_id, status, session };
      state
        .store
        .mark_once_per_day(mark, state.clock.today())
        .await
        .map_err(Error::store)?
    }
    // Session type is accepted in the path but carries no weight here.
    MarkingMode::Simple => state
      .store
      .mark_owned(user.user_id, subject_id, status)
      .await
      .map_err(Error::store)?,
  };

  match &outcome {
    MarkOutcome::Applied { subject, weight } => tracing::info!(
      user_id = %user.user_id,
      subject_id = %subject_id,
      weight,
      present = subject.present_count,
      total = subject.total_classes,
      "marked attendance"
    ),
    _ => tracing::debug!(
      user_id = %user.user_id,
      subject_id = %subject_id,
      outcome = outcome.as_str(),
      "mark ignored"
    ),
  }

  Ok(redirect_with_outcome("/dashboard", outcome.as_str()))
}
