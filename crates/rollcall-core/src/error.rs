//! Error types for `rollcall-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("{0} must not be empty")]
  Empty(&'static str),

  #[error("counter overflow applying weight {weight} to {total} classes")]
  CounterOverflow { total: u32, weight: u32 },

  #[error("present count {present} exceeds total classes {total}")]
  InvalidTally { present: u32, total: u32 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
