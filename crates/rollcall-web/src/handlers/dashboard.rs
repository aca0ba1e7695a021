//! `GET /dashboard`

use axum::{Json, extract::State};
use rollcall_core::{
  store::AttendanceStore,
  subject::{Subject, SubjectId},
};
use serde::Serialize;

use crate::{AppState, auth::CurrentUser, error::Error};

#[derive(Debug, Serialize)]
pub struct Dashboard {
  pub name:       String,
  pub subjects:   Vec<SubjectSummary>,
  /// Subjects with a ledger entry today, across all users. Absent in
  /// simple mode.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub marked_ids: Option<Vec<SubjectId>>,
}

#[derive(Debug, Serialize)]
pub struct SubjectSummary {
  pub id:            SubjectId,
  pub name:          String,
  pub present_count: u32,
  pub total_classes: u32,
  /// Rounded to two decimals; `null` before the first class.
  pub percentage:    Option<f64>,
}

impl TryFrom<Subject> for SubjectSummary {
  type Error = rollcall_core::Error;

  fn try_from(s: Subject) -> Result<Self, Self::Error> {
    let percentage = s.percentage()?.map(|p| (p * 100.0).round() / 100.0);
    Ok(Self {
      id: s.subject_id,
      name: s.name,
      present_count: s.present_count,
      total_classes: s.total_classes,
      percentage,
    })
  }
}

pub async fn handler<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
) -> Result<Json<Dashboard>, Error>
where
  S: AttendanceStore + Clone + Send + Sync + 'static,
{
  let subjects = state
    .store
    .list_subjects(user.user_id)
    .await
    .map_err(Error::store)?;

  let marked_ids = if state.config.marking_mode.has_ledger() {
    Some(
      state
        .store
        .marked_on(state.clock.today())
        .await
        .map_err(Error::store)?,
    )
  } else {
    None
  };

  // Inverted counters mean a corrupt row, not bad input.
  let subjects = subjects
    .into_iter()
    .map(SubjectSummary::try_from)
    .collect::<Result<Vec<_>, _>>()
    .map_err(Error::store)?;

  Ok(Json(Dashboard { name: user.name, subjects, marked_ids }))
}
