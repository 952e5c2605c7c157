//! Date-time helpers for query parameters.
//!
//! The platform reads date range parameters as wall-clock times in a fixed
//! format. The cardholder-scoped listing additionally expects US Eastern
//! time, including daylight saving.

use chrono::{Datelike, DateTime, FixedOffset, NaiveDate, Offset, TimeZone, Utc, Weekday};
use std::fmt::Display;

/// Wire format for date range query parameters
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const EST_HOURS: i32 = 5;
const EDT_HOURS: i32 = 4;

/// Render a date-time as its own wall-clock time, without offset
pub fn format_date_time<Tz>(value: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    value.format(DATE_TIME_FORMAT).to_string()
}

/// Convert any instant to US Eastern time
pub fn to_eastern<Tz: TimeZone>(value: &DateTime<Tz>) -> DateTime<FixedOffset> {
    let instant = value.with_timezone(&Utc);
    instant.with_timezone(&eastern_offset(instant))
}

/// Eastern offset in effect at `instant`.
///
/// DST runs from 02:00 local on the second Sunday of March to 02:00 local
/// on the first Sunday of November.
pub fn eastern_offset(instant: DateTime<Utc>) -> FixedOffset {
    let year = instant.year();
    let dst_start = transition(year, 3, 2, 2 + EST_HOURS);
    let dst_end = transition(year, 11, 1, 2 + EDT_HOURS);

    let in_dst = match (dst_start, dst_end) {
        (Some(start), Some(end)) => instant >= start && instant < end,
        _ => false,
    };

    west(if in_dst { EDT_HOURS } else { EST_HOURS })
}

fn transition(year: i32, month: u32, nth_sunday: u8, utc_hour: i32) -> Option<DateTime<Utc>> {
    let day = NaiveDate::from_weekday_of_month_opt(year, month, Weekday::Sun, nth_sunday)?;
    let at = day.and_hms_opt(utc_hour as u32, 0, 0)?;
    Some(Utc.from_utc_datetime(&at))
}

fn west(hours: i32) -> FixedOffset {
    FixedOffset::west_opt(hours * 3600).unwrap_or_else(|| Utc.fix())
}
