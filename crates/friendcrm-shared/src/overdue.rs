//! Overdue policy.
//!
//! A friend is overdue when the time elapsed since the last contact exceeds
//! their contact cadence. Friends that were never contacted are always
//! overdue. The comparison is strict: a friend contacted exactly
//! `frequency_days` ago is still on time.

use chrono::{DateTime, Utc};

use crate::constants::{DEFAULT_FREQUENCY_DAYS, MILLIS_PER_DAY};

/// Fractional days elapsed between `since` and `now`.
///
/// Negative when `since` lies in the future.
pub fn elapsed_days(since: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - since).num_milliseconds() as f64 / MILLIS_PER_DAY
}

pub fn is_overdue(
    last_contacted_at: Option<DateTime<Utc>>,
    frequency_days: Option<u32>,
    now: DateTime<Utc>,
) -> bool {
    let Some(last) = last_contacted_at else {
        return true;
    };
    let frequency = frequency_days.unwrap_or(DEFAULT_FREQUENCY_DAYS);
    elapsed_days(last, now) > f64::from(frequency)
}

/// Days left before the friend becomes overdue.
///
/// Negative once the cadence has been exceeded, `None` for a friend that was
/// never contacted.
pub fn days_until_due(
    last_contacted_at: Option<DateTime<Utc>>,
    frequency_days: Option<u32>,
    now: DateTime<Utc>,
) -> Option<f64> {
    let last = last_contacted_at?;
    let frequency = frequency_days.unwrap_or(DEFAULT_FREQUENCY_DAYS);
    Some(f64::from(frequency) - elapsed_days(last, now))
}
