//! Human-relative timestamps ("3 minutes ago").
//!
//! Thresholds follow the conventional relative-time scale: each unit is used
//! until its rounded value passes the cut-over, after which the next unit
//! takes over with a singular phrase ("an hour", "a day").

use chrono::{DateTime, Utc};
use mockable::Clock;

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
/// Average Gregorian month.
const MONTH: i64 = 2_629_746;
/// Average Gregorian year.
const YEAR: i64 = 31_556_952;

/// Render `instant` relative to the clock's current time.
///
/// # Examples
/// ```
/// use chrono::{Duration, Utc};
/// use feed::domain::relative_time::from_now;
/// use mockable::DefaultClock;
///
/// let phrase = from_now(&DefaultClock, Utc::now() - Duration::minutes(3));
/// assert_eq!(phrase, "3 minutes ago");
/// ```
pub fn from_now(clock: &dyn Clock, instant: DateTime<Utc>) -> String {
    between(instant, clock.utc())
}

/// Render `instant` relative to `now`.
pub fn between(instant: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let offset = instant.signed_duration_since(now).num_seconds();
    let phrase = phrase(offset.saturating_abs());
    if offset > 0 {
        format!("in {phrase}")
    } else {
        format!("{phrase} ago")
    }
}

fn phrase(seconds: i64) -> String {
    if seconds <= 44 {
        return "a few seconds".to_owned();
    }
    if seconds <= 89 {
        return "a minute".to_owned();
    }
    let minutes = rounded(seconds, MINUTE);
    if minutes <= 44 {
        return format!("{minutes} minutes");
    }
    if minutes <= 89 {
        return "an hour".to_owned();
    }
    let hours = rounded(seconds, HOUR);
    if hours <= 21 {
        return format!("{hours} hours");
    }
    if hours <= 35 {
        return "a day".to_owned();
    }
    let days = rounded(seconds, DAY);
    if days <= 25 {
        return format!("{days} days");
    }
    if days <= 45 {
        return "a month".to_owned();
    }
    let months = rounded(seconds, MONTH);
    if months <= 10 {
        return format!("{months} months");
    }
    if months <= 17 {
        return "a year".to_owned();
    }
    format!("{} years", rounded(seconds, YEAR))
}

/// Round-half-up division for non-negative `seconds`.
fn rounded(seconds: i64, unit: i64) -> i64 {
    seconds
        .saturating_mul(2)
        .saturating_add(unit)
        .div_euclid(unit.saturating_mul(2))
}
