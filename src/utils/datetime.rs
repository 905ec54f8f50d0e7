//! Date and time utility functions for Ecuador time (ECT)
//!
//! The delivery API stores timestamps in UTC. Dates are displayed by taking the
//! UTC field values of an instant and treating them as wall-clock fields
//! ("relabeling") instead of converting between zones. This keeps a date such
//! as `2026-01-31T00:00:00Z` on the 31st no matter where the client runs.
//!
//! "Now" is computed with a fixed UTC-5 offset. Daylight saving and historical
//! offset changes are deliberately not modelled.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::constants::{DATE_INVALID, DATE_NOT_AVAILABLE};

/// Standard date format used by the delivery API for query parameters
pub const API_DATE_FORMAT: &str = "%Y-%m-%d";

/// Fixed offset of Ecuador time from UTC, in hours
pub const ECT_UTC_OFFSET_HOURS: i64 = -5;

/// Offset-less timestamp layouts, read in the local zone like a browser would
const LOCAL_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Short month names as rendered by the `es-EC` locale
const SHORT_MONTHS_ES: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

/// Parse a date string in YYYY-MM-DD format to NaiveDate
pub fn parse_date(date_str: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(date_str, API_DATE_FORMAT)
}

/// Format a NaiveDate to YYYY-MM-DD string
pub fn format_ymd(d: NaiveDate) -> String {
    d.format(API_DATE_FORMAT).to_string()
}

/// Parse a timestamp and relabel its UTC fields as wall-clock fields.
///
/// An empty string yields the current local wall-clock time. Strings that cannot
/// be read as a date yield `None`; no error is reported.
///
/// # Examples
///
/// ```
/// use delivery_desk::utils::datetime::parse_ect_date;
///
/// let date = parse_ect_date("2026-01-31T00:00:00Z").unwrap();
/// assert_eq!(date.to_string(), "2026-01-31 00:00:00");
/// ```
pub fn parse_ect_date(date_str: &str) -> Option<NaiveDateTime> {
    if date_str.is_empty() {
        return Some(Local::now().naive_local());
    }

    parse_instant(date_str).map(|instant| instant.naive_utc())
}

/// Read a timestamp string as an absolute instant
fn parse_instant(date_str: &str) -> Option<DateTime<Utc>> {
    let date_str = date_str.trim();

    // RFC3339 with timezone (e.g., "2026-01-31T14:30:00Z" or "...-05:00")
    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Some(dt.with_timezone(&Utc));
    }

    // Date-only strings are UTC midnight
    if let Ok(date) = parse_date(date_str) {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }

    LOCAL_DATETIME_FORMATS.iter().find_map(|format| {
        let naive = NaiveDateTime::parse_from_str(date_str, format).ok()?;
        Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|local| local.with_timezone(&Utc))
    })
}

/// Format a timestamp string for display in Ecuador time.
///
/// Empty input renders as `"N/A"` while unparsable input renders as
/// `"Invalid Date"`.
///
/// # Arguments
/// * `date_str` - ISO 8601 / RFC3339 timestamp
/// * `include_time` - Append the `HH:MM` time of day
pub fn format_ect(date_str: &str, include_time: bool) -> String {
    if date_str.is_empty() {
        return DATE_NOT_AVAILABLE.to_string();
    }

    match parse_ect_date(date_str) {
        Some(date) => format_ect_datetime(date, include_time),
        None => DATE_INVALID.to_string(),
    }
}

/// Format an already relabeled date as `DD mmm YYYY[, HH:MM]`
pub fn format_ect_datetime(date: NaiveDateTime, include_time: bool) -> String {
    let month = SHORT_MONTHS_ES[date.month0() as usize];
    let day = format!("{:02} {} {}", date.day(), month, date.year());

    if include_time {
        format!("{}, {}", day, date.format("%H:%M"))
    } else {
        day
    }
}

/// Current wall-clock time in Ecuador
pub fn ect_now() -> NaiveDateTime {
    ect_now_at(Utc::now())
}

/// Wall-clock time in Ecuador at the given instant
pub fn ect_now_at(now: DateTime<Utc>) -> NaiveDateTime {
    now.naive_utc() + Duration::hours(ECT_UTC_OFFSET_HOURS)
}

/// Current date in Ecuador as YYYY-MM-DD
pub fn ect_today_string() -> String {
    ect_today_string_at(Utc::now())
}

/// Date in Ecuador at the given instant as YYYY-MM-DD
pub fn ect_today_string_at(now: DateTime<Utc>) -> String {
    format_ymd(ect_now_at(now).date())
}

/// Values that can be compared as Ecuador calendar days
pub trait IntoEctDate {
    fn into_ect_date(self) -> Option<NaiveDateTime>;
}

impl IntoEctDate for &str {
    fn into_ect_date(self) -> Option<NaiveDateTime> {
        parse_ect_date(self)
    }
}

impl IntoEctDate for &String {
    fn into_ect_date(self) -> Option<NaiveDateTime> {
        parse_ect_date(self)
    }
}

impl IntoEctDate for NaiveDateTime {
    fn into_ect_date(self) -> Option<NaiveDateTime> {
        Some(self)
    }
}

impl IntoEctDate for Option<NaiveDateTime> {
    fn into_ect_date(self) -> Option<NaiveDateTime> {
        self
    }
}

/// Check whether two dates fall on the same calendar day in Ecuador time.
///
/// Strings are parsed with [`parse_ect_date`]; date values are assumed to be
/// relabeled already. A date that cannot be parsed never matches.
pub fn is_same_day_ect(a: impl IntoEctDate, b: impl IntoEctDate) -> bool {
    match (a.into_ect_date(), b.into_ect_date()) {
        (Some(a), Some(b)) => a.date() == b.date(),
        _ => false,
    }
}
