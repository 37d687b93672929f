//! Exchange clock helpers.
//!
//! All report timestamps live in a constant US-Eastern offset (UTC-5). Daylight
//! saving is deliberately not applied so that recorded sessions replay identically.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Timelike};
use std::fmt;

/// The fixed UTC-5 offset used for every timestamp in the crate.
pub const EASTERN: FixedOffset = match FixedOffset::west_opt(5 * 3600) {
    Some(offset) => offset,
    None => panic!("UTC-5 is a valid offset"),
};

/// Combine a calendar date and wall-clock time in the Eastern offset.
pub fn at_eastern(date: NaiveDate, time: NaiveTime) -> DateTime<FixedOffset> {
    let local = date.and_time(time);
    let utc = local - Duration::seconds(i64::from(EASTERN.local_minus_utc()));
    DateTime::from_naive_utc_and_offset(utc, EASTERN)
}

/// Build an Eastern timestamp from calendar parts. Returns `None` for impossible dates.
pub fn eastern_datetime(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
) -> Option<DateTime<FixedOffset>> {
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = NaiveTime::from_hms_opt(hour, minute, 0)?;
    Some(at_eastern(date, time))
}

/// Minute-resolution identifier for a bar: the start of the minute in Eastern time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MinuteKey(DateTime<FixedOffset>);

impl MinuteKey {
    pub fn from_time(time: &DateTime<FixedOffset>) -> Self {
        let eastern = time.with_timezone(&EASTERN);
        let truncated = eastern
            - Duration::seconds(i64::from(eastern.second()))
            - Duration::nanoseconds(i64::from(eastern.nanosecond()));
        MinuteKey(truncated)
    }

    pub fn to_time(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

impl fmt::Display for MinuteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M"))
    }
}
