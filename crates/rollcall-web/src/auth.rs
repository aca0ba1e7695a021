//! Password hashing, session tokens, and the logged-in-user extractor.
//!
//! A session is a random token held by the client in the
//! [`SESSION_COOKIE`] cookie. The store only ever sees its SHA-256 digest.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use rand_core::{OsRng, RngCore};
use rollcall_core::{store::AttendanceStore, user::User};
use sha2::{Digest, Sha256};

use crate::{AppState, error::Error};

pub const SESSION_COOKIE: &str = "rollcall_session";

// ─── Passwords ───────────────────────────────────────────────────────────────

/// Hash `plain` into an argon2 PHC string with a fresh random salt.
pub fn hash_password(plain: &str) -> Result<String, Error> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(plain.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| Error::PasswordHash(e.to_string()))
}

/// Check `plain` against a stored PHC string. A malformed hash never
/// verifies.
pub fn verify_password(plain: &str, hash: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(hash) else {
    return false;
  };
  Argon2::default()
    .verify_password(plain.as_bytes(), &parsed)
    .is_ok()
}

// ─── Session tokens ──────────────────────────────────────────────────────────

/// A freshly issued session token and the digest persisted for it.
pub struct SessionToken {
  pub token:  String,
  pub digest: String,
}

impl SessionToken {
  pub fn generate() -> Self {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    let token = hex::encode(bytes);
    let digest = token_digest(&token);
    Self { token, digest }
  }
}

pub fn token_digest(token: &str) -> String { hex::encode(Sha256::digest(token.as_bytes())) }

/// `Set-Cookie` value carrying `token`.
pub fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
  let mut cookie =
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}");
  if secure {
    cookie.push_str("; Secure");
  }
  cookie
}

/// `Set-Cookie` value that removes the session cookie.
pub fn expired_cookie() -> String {
  format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Extract the session token from the request's `Cookie` headers.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
  headers
    .get_all(header::COOKIE)
    .iter()
    .filter_map(|v| v.to_str().ok())
    .flat_map(|v| v.split(';'))
    .filter_map(|pair| pair.trim().split_once('='))
    .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
    .map(|(_, value)| value.to_owned())
}

// ─── Extractor ───────────────────────────────────────────────────────────────

/// The authenticated caller. Handlers that take this require a login;
/// without a valid session the request is redirected to `/login`.
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<AppState<S>> for CurrentUser
where
  S: AttendanceStore + Clone + Send + Sync + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let token = token_from_headers(&parts.headers).ok_or(Error::Unauthorized)?;
    let digest = token_digest(&token);

    let user_id = state
      .store
      .session_user(&digest, state.clock.now())
      .await
      .map_err(Error::store)?
      .ok_or(Error::Unauthorized)?;

    let user = state
      .store
      .get_user(user_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::Unauthorized)?;

    Ok(CurrentUser(user))
  }
}
