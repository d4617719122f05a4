// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Timelike, Utc};
use finsight::engine::{DashboardQuery, DateFilter, EngineError, Granularity, window::local_midnight};

fn at(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

fn window_for(q: &DashboardQuery, now: &DateTime<Utc>) -> finsight::engine::TimeWindow {
    q.parse().unwrap().resolve(now).unwrap()
}

/// Every hour of every day from `first` through `last` is inside, and the
/// second before `first` and the first instant after `last` are not.
fn assert_covers_exactly(
    w: &finsight::engine::TimeWindow,
    first: NaiveDate,
    last: NaiveDate,
) {
    let start = Utc.from_utc_datetime(&first.and_hms_opt(0, 0, 0).unwrap());
    let end = Utc.from_utc_datetime(&last.succ_opt().unwrap().and_hms_opt(0, 0, 0).unwrap());
    let mut t = start;
    while t < end {
        assert!(w.contains(&t), "{} should be inside", t);
        t += Duration::hours(1);
    }
    assert!(w.contains(&(end - Duration::seconds(1))));
    assert!(!w.contains(&(start - Duration::seconds(1))));
    assert!(!w.contains(&end));
}

#[test]
fn month_covers_leap_february_exactly() {
    let now = at("2024-02-10T15:00:00Z");
    let w = window_for(&DashboardQuery::named("month"), &now);
    assert_covers_exactly(
        &w,
        NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
    );
}

#[test]
fn month_covers_thirty_one_day_month_and_december() {
    let now = at("2024-03-31T23:00:00Z");
    let w = window_for(&DashboardQuery::named("month"), &now);
    assert_covers_exactly(
        &w,
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
    );

    let now = at("2023-12-05T00:00:00Z");
    let w = window_for(&DashboardQuery::named("month"), &now);
    assert_covers_exactly(
        &w,
        NaiveDate::from_ymd_opt(2023, 12, 1).unwrap(),
        NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
    );
}

#[test]
fn year_runs_jan_first_through_dec_thirty_first() {
    let now = at("2024-06-15T12:00:00Z");
    let w = window_for(&DashboardQuery::named("Year"), &now);
    assert!(w.contains(&at("2024-01-01T00:00:00Z")));
    assert!(w.contains(&at("2024-12-31T23:59:59Z")));
    assert!(!w.contains(&at("2023-12-31T23:59:59Z")));
    assert!(!w.contains(&at("2025-01-01T00:00:00Z")));
}

#[test]
fn week_starts_on_local_sunday() {
    // Wednesday 15 May 2024; the week began Sunday the 12th.
    let now = at("2024-05-15T10:00:00Z");
    let w = window_for(&DashboardQuery::named("week"), &now);
    assert!(!w.contains(&at("2024-05-11T23:59:59Z")));
    assert!(w.contains(&at("2024-05-12T00:00:00Z")));
    assert!(w.contains(&at("2024-05-16T09:59:59Z")));
    assert!(!w.contains(&at("2024-05-16T10:00:00Z")));
}

#[test]
fn day_uses_the_callers_time_zone() {
    let tz = FixedOffset::west_opt(5 * 3600).unwrap();
    let now = tz.with_ymd_and_hms(2024, 5, 15, 20, 0, 0).unwrap();
    let w = DateFilter::Day.resolve(&now).unwrap();
    // Local midnight at UTC-5 is 05:00Z.
    assert!(!w.contains(&at("2024-05-15T04:59:59Z")));
    assert!(w.contains(&at("2024-05-15T05:00:00Z")));
    assert!(w.contains(&at("2024-05-17T00:59:59Z")));
    assert!(!w.contains(&at("2024-05-17T01:00:00Z")));
}

#[test]
fn day_starts_after_a_skipped_midnight() {
    // Sao Paulo jumped from 00:00 to 01:00 on 2018-11-04.
    let tz = chrono_tz::America::Sao_Paulo;
    let now = tz.with_ymd_and_hms(2018, 11, 4, 10, 0, 0).unwrap();
    let w = DateFilter::Day.resolve(&now).unwrap();
    // 01:00 local at -02:00.
    assert!(!w.contains(&at("2018-11-04T02:59:59Z")));
    assert!(w.contains(&at("2018-11-04T03:00:00Z")));

    let start = local_midnight(&tz, NaiveDate::from_ymd_opt(2018, 11, 4).unwrap()).unwrap();
    assert_eq!(start, at("2018-11-04T03:00:00Z"));
    assert_eq!(start.with_timezone(&tz).hour(), 1);
}

#[test]
fn explicit_range_is_inclusive_on_both_days() {
    let now = at("2024-06-15T12:00:00Z");
    let q = DashboardQuery::new(None, Some("2024-01-01"), Some("2024-01-31"));
    let w = window_for(&q, &now);
    assert!(w.contains(&at("2024-01-01T00:00:00Z")));
    assert!(w.contains(&at("2024-01-31T23:59:59Z")));
    assert!(!w.contains(&at("2024-02-01T00:00:00Z")));
    assert!(!w.contains(&at("2023-12-31T23:59:59Z")));
}

#[test]
fn half_open_ranges_and_timestamps() {
    let now = at("2024-06-15T12:00:00Z");

    let w = window_for(&DashboardQuery::new(None, Some("2024-03-01"), None), &now);
    assert!(w.contains(&at("2030-01-01T00:00:00Z")));
    assert!(!w.contains(&at("2024-02-29T23:59:59Z")));

    let w = window_for(&DashboardQuery::new(None, None, Some("2024-03-01")), &now);
    assert!(w.contains(&at("1999-01-01T00:00:00Z")));
    assert!(w.contains(&at("2024-03-01T18:00:00Z")));
    assert!(!w.contains(&at("2024-03-02T00:00:00Z")));

    let q = DashboardQuery::new(None, None, Some("2024-03-01T12:00:00Z"));
    let w = window_for(&q, &now);
    assert!(w.contains(&at("2024-03-01T12:00:00Z")));
    assert!(!w.contains(&at("2024-03-01T12:00:01Z")));
}

#[test]
fn no_filter_and_no_dates_lets_everything_through() {
    let now = at("2024-06-15T12:00:00Z");
    let q = DashboardQuery::new(None, Some(""), Some("  "));
    assert_eq!(q.parse().unwrap(), DateFilter::All);
    let w = window_for(&q, &now);
    assert!(w.contains(&at("1970-01-01T00:00:00Z")));
    assert!(w.contains(&at("2100-01-01T00:00:00Z")));
}

#[test]
fn filter_wins_over_explicit_dates() {
    let q = DashboardQuery::new(Some("year"), Some("not-a-date"), Some("2024-01-01"));
    assert_eq!(q.parse().unwrap(), DateFilter::Year);
}

#[test]
fn bad_input_is_a_validation_error() {
    for q in [
        DashboardQuery::named("quarter"),
        DashboardQuery::new(None, Some("01/02/2024"), None),
        DashboardQuery::new(None, None, Some("yesterday")),
    ] {
        assert!(matches!(q.parse(), Err(EngineError::Validation(_))), "{:?}", q);
    }
}

#[test]
fn granularity_and_period_names() {
    assert_eq!(DateFilter::Day.granularity(), Granularity::Hour);
    assert_eq!(DateFilter::Week.granularity(), Granularity::Day);
    assert_eq!(DateFilter::Month.granularity(), Granularity::Day);
    assert_eq!(DateFilter::Year.granularity(), Granularity::Month);
    assert_eq!(DateFilter::All.granularity(), Granularity::Day);

    let q = DashboardQuery::new(None, Some("2024-01-05"), Some("2024-02-10"));
    assert_eq!(q.parse().unwrap().describe(), "Jan 05, 2024 - Feb 10, 2024");
    assert_eq!(DateFilter::All.describe(), "All Time");
    assert_eq!(DateFilter::Week.describe(), "This Week");
}
