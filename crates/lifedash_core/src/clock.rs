//! Wall-clock source for "today" windows and id generation.
//!
//! # Invariants
//! - Store code never reads the system time directly; it asks its `Clock`.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Source of the current local date and time.
pub trait Clock {
    /// Current local wall-clock time.
    fn now(&self) -> NaiveDateTime;

    /// Current local calendar day.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Clock backed by the host's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Manually driven clock for deterministic callers and tests.
///
/// Clones share the same instant, so a test can keep a handle and move time
/// forward after handing the clock to a store.
#[derive(Debug, Clone)]
pub struct FixedClock {
    epoch_ms: Arc<AtomicI64>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            epoch_ms: Arc::new(AtomicI64::new(now.and_utc().timestamp_millis())),
        }
    }

    /// Clock pinned to noon of `date`.
    pub fn at_date(date: NaiveDate) -> Self {
        Self::new(date.and_hms_opt(12, 0, 0).unwrap_or_default())
    }

    pub fn advance_days(&self, days: i64) {
        self.epoch_ms
            .fetch_add(days * 24 * 60 * 60 * 1000, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        DateTime::from_timestamp_millis(self.epoch_ms.load(Ordering::SeqCst))
            .map(|instant| instant.naive_utc())
            .unwrap_or_default()
    }
}
