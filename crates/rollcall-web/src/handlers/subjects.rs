//! Subject creation and deletion.

use axum::{
  Form,
  extract::{Path, State},
  response::Response,
};
use rollcall_core::{
  attendance::{CreateOutcome, DeleteOutcome},
  store::AttendanceStore,
  subject::SubjectName,
};

use super::{parse_sub_id, redirect_with_outcome};
use crate::{AppState, auth::CurrentUser, error::Error, forms::AddSubjectForm};

/// `POST /add_subject`. A blank name is skipped.
pub async fn add<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Form(form): Form<AddSubjectForm>,
) -> Result<Response, Error>
where
  S: AttendanceStore + Clone + Send + Sync + 'static,
{
  let outcome = match SubjectName::parse(&form.sub_name) {
    Ok(name) => {
      let subject = state
        .store
        .add_subject(user.user_id, name)
        .await
        .map_err(Error::store)?;
      tracing::info!(
        user_id = %user.user_id,
        subject_id = %subject.subject_id,
        "added subject"
      );
      CreateOutcome::Created(subject)
    }
    Err(_) => {
      tracing::debug!(user_id = %user.user_id, "blank subject name skipped");
      CreateOutcome::Skipped
    }
  };

  Ok(redirect_with_outcome("/dashboard", outcome.as_str()))
}

/// `POST /delete_subject/{sub_id}`. Only mounted in ledger mode.
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Path(sub_id): Path<String>,
) -> Result<Response, Error>
where
  S: AttendanceStore + Clone + Send + Sync + 'static,
{
  let subject_id = parse_sub_id(&sub_id)?;
  let outcome = state
    .store
    .delete_subject(user.user_id, subject_id)
    .await
    .map_err(Error::store)?;

  match outcome {
    DeleteOutcome::Deleted { records_removed } => tracing::info!(
      user_id = %user.user_id,
      subject_id = %subject_id,
      records_removed,
      "deleted subject"
    ),
    _ => tracing::debug!(
      user_id = %user.user_id,
      subject_id = %subject_id,
      outcome = outcome.as_str(),
      "delete ignored"
    ),
  }

  Ok(redirect_with_outcome("/dashboard", outcome.as_str()))
}
