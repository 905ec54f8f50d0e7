use chrono::{Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use delivery_desk::utils::datetime::*;

fn naive(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, s).unwrap()
}

#[test]
fn test_format_ymd() {
    let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
    assert_eq!(format_ymd(date), "2026-01-05");
    assert_eq!(parse_date("2026-01-05").unwrap(), date);
}

#[test]
fn test_parse_keeps_utc_fields() {
    // Midnight UTC stays on the same calendar day
    assert_eq!(parse_ect_date("2026-01-31T00:00:00Z"), Some(naive(2026, 1, 31, 0, 0, 0)));
    assert_eq!(parse_ect_date("2026-01-31T14:30:15.250Z").map(|d| d.date()), NaiveDate::from_ymd_opt(2026, 1, 31));
}

#[test]
fn test_parse_offset_timestamp_relabels_utc() {
    // 21:00 in Ecuador is 02:00 UTC on the next day
    assert_eq!(parse_ect_date("2026-01-31T21:00:00-05:00"), Some(naive(2026, 2, 1, 2, 0, 0)));
}

#[test]
fn test_parse_date_only_is_utc_midnight() {
    assert_eq!(parse_ect_date("2026-03-15"), Some(naive(2026, 3, 15, 0, 0, 0)));
}

#[test]
fn test_parse_offsetless_timestamp_uses_local_zone() {
    let expected = Local
        .from_local_datetime(&naive(2026, 6, 1, 9, 0, 0))
        .earliest()
        .unwrap()
        .naive_utc();
    assert_eq!(parse_ect_date("2026-06-01T09:00:00"), Some(expected));
    assert_eq!(parse_ect_date("2026-06-01 09:00"), Some(expected));
}

#[test]
fn test_parse_invalid_is_none() {
    assert_eq!(parse_ect_date("not a date"), None);
    assert_eq!(parse_ect_date("2026-13-45"), None);
}

#[test]
fn test_parse_empty_is_now() {
    let before = Local::now().naive_local();
    let parsed = parse_ect_date("").unwrap();
    let after = Local::now().naive_local();

    assert!(parsed >= before && parsed <= after);
}

#[test]
fn test_format_empty_and_invalid() {
    assert_eq!(format_ect("", true), "N/A");
    assert_eq!(format_ect("", false), "N/A");
    assert_eq!(format_ect("yesterday-ish", true), "Invalid Date");
}

#[test]
fn test_format_with_and_without_time() {
    assert_eq!(format_ect("2026-01-31T14:05:00Z", true), "31 ene 2026, 14:05");
    assert_eq!(format_ect("2026-01-31T14:05:00Z", false), "31 ene 2026");
    assert_eq!(format_ect("2025-09-03T00:00:00Z", false), "03 sept 2025");
    assert_eq!(format_ect_datetime(naive(2024, 12, 24, 8, 0, 0), true), "24 dic 2024, 08:00");
}

#[test]
fn test_ect_now_is_fixed_offset() {
    let instant = Utc.with_ymd_and_hms(2026, 7, 10, 12, 0, 0).unwrap();
    assert_eq!(ect_now_at(instant), naive(2026, 7, 10, 7, 0, 0));

    let drift = (ect_now() - ect_now_at(Utc::now())).num_seconds().abs();
    assert!(drift <= 1);
}

#[test]
fn test_today_advances_at_ect_midnight() {
    let before = Utc.with_ymd_and_hms(2026, 1, 2, 4, 59, 59).unwrap();
    let after = Utc.with_ymd_and_hms(2026, 1, 2, 5, 0, 0).unwrap();

    assert_eq!(ect_today_string_at(before), "2026-01-01");
    assert_eq!(ect_today_string_at(after), "2026-01-02");
}

#[test]
fn test_today_string_shape() {
    let today = ect_today_string();
    assert_eq!(today.len(), 10);
    assert!(parse_date(&today).is_ok());
    assert_eq!(&today[4..5], "-");
    assert_eq!(&today[7..8], "-");
}

#[test]
fn test_same_day_reflexive() {
    let date = naive(2026, 1, 31, 23, 59, 59);
    assert!(is_same_day_ect(date, date));
    assert!(is_same_day_ect("2026-01-31T10:00:00Z", "2026-01-31T10:00:00Z"));
}

#[test]
fn test_same_day_24_hours_later() {
    assert!(!is_same_day_ect("2026-01-31T00:00:00Z", "2026-02-01T00:00:00Z"));
}

#[test]
fn test_same_day_across_ect_midnight() {
    // 01:00Z is still January 30th on an Ecuador wall clock, 23:00Z is the
    // 31st, but relabeling compares the UTC fields so both are the 31st
    assert!(is_same_day_ect("2026-01-31T01:00:00Z", "2026-01-31T23:00:00Z"));
    assert!(!is_same_day_ect("2026-01-31T23:00:00Z", "2026-02-01T01:00:00Z"));
}

#[test]
fn test_same_day_mixed_inputs() {
    let relabeled = parse_ect_date("2026-05-20T18:00:00Z");
    assert!(is_same_day_ect(relabeled, "2026-05-20"));

    let owned = String::from("2026-05-20T03:00:00Z");
    assert!(is_same_day_ect(&owned, naive(2026, 5, 20, 12, 0, 0)));
}

#[test]
fn test_same_day_invalid_never_matches() {
    assert!(!is_same_day_ect("garbage", "garbage"));
    assert!(!is_same_day_ect("garbage", "2026-05-20"));
}
