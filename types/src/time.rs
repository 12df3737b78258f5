//! Timestamp type and the injectable clock.
//!
//! Timestamps are Unix epoch seconds (UTC). Calendar arithmetic (birthdays,
//! validity years) goes through `chrono`; storage and comparisons stay on the
//! plain seconds value.

use chrono::{DateTime, Months, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// A Unix timestamp in seconds since epoch (UTC).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch (time zero).
    pub const EPOCH: Self = Self(0);

    pub fn new(secs: u64) -> Self {
        Self(secs)
    }

    /// Get the current system time as a `Timestamp`.
    ///
    /// A system clock set before the epoch reads as the epoch.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// Seconds elapsed since this timestamp (relative to `now`).
    pub fn elapsed_since(&self, now: Timestamp) -> u64 {
        now.0.saturating_sub(self.0)
    }

    /// Whether this timestamp + duration has passed relative to `now`.
    pub fn has_expired(&self, duration_secs: u64, now: Timestamp) -> bool {
        now.0 >= self.0.saturating_add(duration_secs)
    }

    /// This timestamp shifted forward by `secs`.
    pub fn plus_secs(&self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs))
    }

    /// This timestamp shifted forward by whole calendar years.
    ///
    /// February 29th lands on February 28th in non-leap target years.
    pub fn plus_years(&self, years: u32) -> Self {
        let shifted = self
            .to_datetime()
            .checked_add_months(Months::new(years.saturating_mul(12)));
        match shifted {
            Some(dt) => Self::from_datetime(dt),
            None => Self(u64::MAX),
        }
    }

    /// Whether `self` lies in the closed interval `[from, until]`.
    pub fn within(&self, from: Timestamp, until: Timestamp) -> bool {
        from <= *self && *self <= until
    }

    pub fn to_datetime(&self) -> DateTime<Utc> {
        let secs = i64::try_from(self.0).unwrap_or(i64::MAX);
        DateTime::from_timestamp(secs, 0).unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Timestamps before the epoch clamp to the epoch.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(u64::try_from(dt.timestamp()).unwrap_or(0))
    }

    /// ISO-8601 / RFC 3339 rendering, e.g. `2024-06-01T00:00:00Z`.
    pub fn to_rfc3339(&self) -> String {
        self.to_datetime()
            .to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// Source of the current time.
///
/// Services take an `Arc<dyn Clock>` so tests can substitute a deterministic
/// clock (see `agegate-nullables`).
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// The wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-06-01T00:00:00Z
    const JUNE_2024: u64 = 1_717_200_000;

    #[test]
    fn rfc3339_rendering() {
        assert_eq!(Timestamp::new(JUNE_2024).to_rfc3339(), "2024-06-01T00:00:00Z");
        assert_eq!(Timestamp::EPOCH.to_rfc3339(), "1970-01-01T00:00:00Z");
    }

    #[test]
    fn plus_years_is_calendar_aware() {
        let later = Timestamp::new(JUNE_2024).plus_years(2);
        assert_eq!(later.to_rfc3339(), "2026-06-01T00:00:00Z");
    }

    #[test]
    fn plus_years_clamps_leap_day() {
        // 2024-02-29T12:00:00Z
        let leap = Timestamp::new(1_709_208_000);
        assert_eq!(leap.plus_years(1).to_rfc3339(), "2025-02-28T12:00:00Z");
        assert_eq!(leap.plus_years(4).to_rfc3339(), "2028-02-29T12:00:00Z");
    }

    #[test]
    fn within_is_inclusive() {
        let from = Timestamp::new(10);
        let until = Timestamp::new(20);
        assert!(Timestamp::new(10).within(from, until));
        assert!(Timestamp::new(20).within(from, until));
        assert!(!Timestamp::new(21).within(from, until));
        assert!(!Timestamp::new(9).within(from, until));
    }

    #[test]
    fn expiry_boundary() {
        let issued = Timestamp::new(100);
        assert!(!issued.has_expired(300, Timestamp::new(399)));
        assert!(issued.has_expired(300, Timestamp::new(400)));
    }
}
