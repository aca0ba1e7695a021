//! HTTP layer for Rollcall.
//!
//! Exposes an axum [`Router`] serving the form-driven attendance tracker
//! backed by any [`AttendanceStore`]. Form actions answer with `303`
//! redirects, as a browser form post expects; the dashboard is JSON.

pub mod auth;
pub mod config;
pub mod error;
pub mod forms;
pub mod handlers;

pub use config::ServerConfig;
pub use error::Error;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use rollcall_core::{clock::Clock, store::AttendanceStore};
use tower_http::trace::TraceLayer;

use handlers::{account, dashboard, marking, subjects};

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
  /// Source of "now" for sessions and "today" for the daily ledger.
  pub clock:  Arc<dyn Clock>,
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the application router. `/delete_subject` exists only in ledger
/// mode.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: AttendanceStore + Clone + Send + Sync + 'static,
{
  let mut router = Router::new()
    .route("/", post(account::login::<S>))
    .route("/login", post(account::login::<S>))
    .route("/register", post(account::register::<S>))
    .route("/logout", get(account::logout::<S>))
    .route("/dashboard", get(dashboard::handler::<S>))
    .route("/add_subject", post(subjects::add::<S>))
    .route("/mark/{sub_id}/{status}", post(marking::handler::<S>))
    .route("/mark/{sub_id}/{status}/{session_type}", post(marking::handler::<S>))
    .route("/health", get(health));

  if state.config.marking_mode.has_ledger() {
    router = router.route("/delete_subject/{sub_id}", post(subjects::delete::<S>));
  }

  router.layer(TraceLayer::new_for_http()).with_state(state)
}

async fn health() -> &'static str { "ok" }
