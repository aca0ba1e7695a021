//! Error types and axum `IntoResponse` implementation.

use axum::{
  Json,
  http::{StatusCode, header::InvalidHeaderValue},
  response::{IntoResponse, Redirect, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// No valid session; the client is sent to the login form.
  #[error("unauthorized")]
  Unauthorized,
  #[error("invalid credentials")]
  InvalidCredentials,
  #[error("not found")]
  NotFound,
  #[error("bad request: {0}")]
  BadRequest(String),
  #[error("password hashing error: {0}")]
  PasswordHash(String),
  #[error("invalid header value: {0}")]
  Header(#[from] InvalidHeaderValue),
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Error::Store(Box::new(e))
  }
}

impl From<rollcall_core::Error> for Error {
  fn from(e: rollcall_core::Error) -> Self { Error::BadRequest(e.to_string()) }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      Error::Unauthorized => return Redirect::to("/login").into_response(),
      Error::InvalidCredentials => (StatusCode::UNAUTHORIZED, self.to_string()),
      Error::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
      Error::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      Error::PasswordHash(_) | Error::Header(_) | Error::Store(_) => {
        tracing::error!(error = %self, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
