//! Registration, login, and logout.

use axum::{
  Form,
  extract::State,
  http::{HeaderMap, HeaderValue, header},
  response::{IntoResponse, Redirect, Response},
};
use rollcall_core::{store::AttendanceStore, user::NewUser};

use crate::{
  AppState,
  auth::{
    SessionToken, expired_cookie, hash_password, session_cookie, token_digest,
    token_from_headers, verify_password,
  },
  error::Error,
  forms::{LoginForm, RegisterForm},
};

/// `POST /register`
pub async fn register<S>(
  State(state): State<AppState<S>>,
  Form(form): Form<RegisterForm>,
) -> Result<Response, Error>
where
  S: AttendanceStore + Clone + Send + Sync + 'static,
{
  form.validate()?;

  let password_hash = hash_password(&form.password)?;
  let new_user = NewUser::new(form.name, form.gmail, password_hash)?;

  // A taken e-mail fails on the unique constraint and surfaces as a 500.
  let user = state.store.create_user(new_user).await.map_err(Error::store)?;
  tracing::info!(user_id = %user.user_id, "registered user");

  Ok(Redirect::to("/login").into_response())
}

/// `POST /login` and `POST /`
pub async fn login<S>(
  State(state): State<AppState<S>>,
  Form(form): Form<LoginForm>,
) -> Result<Response, Error>
where
  S: AttendanceStore + Clone + Send + Sync + 'static,
{
  form.validate()?;

  let user = state
    .store
    .find_user_by_email(&form.gmail)
    .await
    .map_err(Error::store)?;

  let Some(user) = user.filter(|u| verify_password(&form.password, &u.password_hash)) else {
    tracing::warn!(email = %form.gmail, "failed login");
    return Err(Error::InvalidCredentials);
  };

  let session = SessionToken::generate();
  let ttl = state.config.session_ttl();
  state
    .store
    .open_session(user.user_id, session.digest, state.clock.now() + ttl)
    .await
    .map_err(Error::store)?;
  tracing::info!(user_id = %user.user_id, "logged in");

  let cookie = HeaderValue::from_str(&session_cookie(
    &session.token,
    ttl.num_seconds(),
    state.config.secure_cookies,
  ))?;
  Ok(([(header::SET_COOKIE, cookie)], Redirect::to("/dashboard")).into_response())
}

/// `GET /logout`. Succeeds with or without a live session.
pub async fn logout<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
) -> Result<Response, Error>
where
  S: AttendanceStore + Clone + Send + Sync + 'static,
{
  if let Some(token) = token_from_headers(&headers) {
    state
      .store
      .close_session(&token_digest(&token))
      .await
      .map_err(Error::store)?;
    tracing::info!("logged out");
  }

  let cookie = HeaderValue::from_str(&expired_cookie())?;
  Ok(([(header::SET_COOKIE, cookie)], Redirect::to("/login")).into_response())
}
