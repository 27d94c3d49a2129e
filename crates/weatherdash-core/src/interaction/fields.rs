//! Calendar-date and time-of-day edits. All in UTC.

use chrono::{NaiveDate, NaiveTime};

use crate::timeline::TimeInstant;

/// Parse `HH:MM` (a trailing `:SS` is accepted and dropped). Anything
/// malformed or out of range is `None`.
pub fn parse_time_of_day(text: &str) -> Option<NaiveTime> {
    let mut parts = text.trim().split(':');
    let hours: u32 = parts.next()?.trim().parse().ok()?;
    let minutes: u32 = parts.next()?.trim().parse().ok()?;
    if let Some(seconds) = parts.next() {
        seconds.trim().parse::<u32>().ok().filter(|s| *s < 60)?;
    }
    if parts.next().is_some() {
        return None;
    }
    NaiveTime::from_hms_opt(hours, minutes, 0)
}

/// Same calendar day as `base`, at `time` (seconds and below zeroed).
pub fn with_time_of_day(base: TimeInstant, time: NaiveTime) -> TimeInstant {
    base.date_naive().and_time(time).and_utc()
}

/// `date`, keeping the time of day of `base`.
pub fn with_date(base: TimeInstant, date: NaiveDate) -> TimeInstant {
    date.and_time(base.time()).and_utc()
}
