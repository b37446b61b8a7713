//! Injected time capability.
//!
//! All calendar math in the engine goes through a [`Clock`] so tests can
//! simulate day boundaries exactly. Dates are UTC calendar days, matching
//! the ISO date strings the original persisted records used.

use chrono::{DateTime, NaiveDate, Utc};

/// Source of the current instant and calendar date.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// Today's UTC calendar date.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall-clock implementation used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fixed-instant clock for tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Midnight UTC on the given date.
    ///
    /// # Panics
    ///
    /// Panics if the date components do not form a valid calendar date.
    #[must_use]
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Self {
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .expect("valid calendar date")
            .and_hms_opt(0, 0, 0)
            .expect("valid midnight time");
        Self(date.and_utc())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_reports_its_date() {
        let clock = FixedClock::from_ymd(2025, 6, 1);
        assert_eq!(
            clock.today(),
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
        );
    }

    #[test]
    fn system_clock_today_matches_now() {
        let clock = SystemClock;
        assert_eq!(clock.today(), clock.now().date_naive());
    }
}
