//! Core types and trait definitions for the Rollcall attendance tracker.
//!
//! This crate holds the accounting rules (weights, counters, the once-per-day
//! guard's outcomes) and the [`store::AttendanceStore`] abstraction. It has no
//! HTTP or database dependencies.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod attendance;
pub mod clock;
pub mod error;
pub mod store;
pub mod subject;
pub mod user;

pub use error::{Error, Result};
