//! The single source of "now" for selection and logging.

use std::sync::{
  Arc,
  atomic::{AtomicI64, Ordering},
};

use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Time source. Everything that asks "is it today?" goes through one of
/// these so tests can pin the calendar.
pub trait Clock: Send + Sync + 'static {
  fn now(&self) -> DateTime<Utc>;

  /// The current calendar date, in UTC.
  fn today(&self) -> NaiveDate { self.now().date_naive() }
}

/// Reads the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Utc> { Utc::now() }
}

/// A clock pinned to an instant that only moves when told to.
///
/// Clones share the same instant.
#[derive(Debug, Clone)]
pub struct FixedClock {
  millis: Arc<AtomicI64>,
}

impl FixedClock {
  pub fn new(at: DateTime<Utc>) -> Self {
    Self { millis: Arc::new(AtomicI64::new(at.timestamp_millis())) }
  }

  /// Midday UTC on `date`.
  pub fn on(date: NaiveDate) -> Self {
    Self::new(date.and_hms_opt(12, 0, 0).unwrap_or_default().and_utc())
  }

  pub fn set(&self, at: DateTime<Utc>) {
    self.millis.store(at.timestamp_millis(), Ordering::SeqCst);
  }

  pub fn advance(&self, by: Duration) {
    self.millis.fetch_add(by.num_milliseconds(), Ordering::SeqCst);
  }
}

impl Clock for FixedClock {
  fn now(&self) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(self.millis.load(Ordering::SeqCst))
      .unwrap_or_default()
  }
}
