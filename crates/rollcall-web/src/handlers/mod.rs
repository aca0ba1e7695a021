pub mod account;
pub mod dashboard;
pub mod marking;
pub mod subjects;

use axum::response::{IntoResponse, Redirect, Response};
use rollcall_core::subject::SubjectId;

use crate::error::Error;

/// Response header naming what a form action did.
pub const OUTCOME_HEADER: &str = "x-rollcall-outcome";

/// Redirect like a form post would, reporting `outcome` alongside.
pub(crate) fn redirect_with_outcome(to: &str, outcome: &'static str) -> Response {
  ([(OUTCOME_HEADER, outcome)], Redirect::to(to)).into_response()
}

/// Parse a `{sub_id}` path segment. Anything but plain digits is treated as
/// an unknown route.
pub(crate) fn parse_sub_id(raw: &str) -> Result<SubjectId, Error> {
  if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
    return Err(Error::NotFound);
  }
  raw.parse().map(SubjectId).map_err(|_| Error::NotFound)
}
