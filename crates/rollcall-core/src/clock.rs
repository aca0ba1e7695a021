//! Time source for "today". Injected so the once-per-day rule can be tested
//! across simulated days.

use chrono::{DateTime, Local, NaiveDate, Utc};

pub trait Clock: Send + Sync {
  fn now(&self) -> DateTime<Utc>;

  /// The calendar day marks are recorded against.
  fn today(&self) -> NaiveDate;
}

/// The host clock. Days follow the server's local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Utc> { Utc::now() }

  fn today(&self) -> NaiveDate { Local::now().date_naive() }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
  /// Midday UTC on the given date.
  pub fn on(date: NaiveDate) -> Self {
    Self(date.and_hms_opt(12, 0, 0).unwrap_or_default().and_utc())
  }
}

impl Clock for FixedClock {
  fn now(&self) -> DateTime<Utc> { self.0 }

  fn today(&self) -> NaiveDate { self.0.date_naive() }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fixed_clock_reports_its_day() {
    let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let clock = FixedClock::on(day);
    assert_eq!(clock.today(), day);
    assert_eq!(clock.now().date_naive(), day);
  }
}
