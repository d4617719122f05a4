// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Turns `filter` / `startDate` / `endDate` request parameters into a concrete
//! UTC window. Named periods are resolved in the time zone of the `now` they
//! are given, so the same code serves local-time CLI use and fixed-offset tests.

use std::ops::{Bound, RangeBounds};

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::EngineError;
use super::trend::Granularity;

/// Raw caller parameters, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQuery {
    pub filter: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl DashboardQuery {
    pub fn new(
        filter: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Self {
        Self {
            filter: filter.map(str::to_string),
            start_date: start_date.map(str::to_string),
            end_date: end_date.map(str::to_string),
        }
    }

    pub fn named(filter: &str) -> Self {
        Self::new(Some(filter), None, None)
    }

    /// A present `filter` wins over explicit dates; blank strings count as absent.
    pub fn parse(&self) -> Result<DateFilter, EngineError> {
        if let Some(f) = non_blank(&self.filter) {
            return DateFilter::from_keyword(f);
        }
        let start = non_blank(&self.start_date).map(parse_bound).transpose()?;
        let end = non_blank(&self.end_date).map(parse_bound).transpose()?;
        if start.is_none() && end.is_none() {
            return Ok(DateFilter::All);
        }
        Ok(DateFilter::Range { start, end })
    }
}

fn non_blank(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// One end of an explicit range: a whole local day or an exact instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBound {
    Day(NaiveDate),
    Instant(DateTime<FixedOffset>),
}

impl DateBound {
    fn calendar_date(&self) -> NaiveDate {
        match self {
            DateBound::Day(d) => *d,
            DateBound::Instant(t) => t.date_naive(),
        }
    }
}

fn parse_bound(s: &str) -> Result<DateBound, EngineError> {
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(DateBound::Day(d));
    }
    DateTime::parse_from_rfc3339(s)
        .map(DateBound::Instant)
        .map_err(|_| {
            EngineError::Validation(format!(
                "Invalid date '{}', expected YYYY-MM-DD or an RFC 3339 timestamp",
                s
            ))
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFilter {
    All,
    Day,
    Week,
    Month,
    Year,
    Range {
        start: Option<DateBound>,
        end: Option<DateBound>,
    },
}

impl DateFilter {
    pub fn from_keyword(s: &str) -> Result<Self, EngineError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(DateFilter::Day),
            "week" => Ok(DateFilter::Week),
            "month" => Ok(DateFilter::Month),
            "year" => Ok(DateFilter::Year),
            "none" | "all" => Ok(DateFilter::All),
            other => Err(EngineError::Validation(format!(
                "Unknown filter '{}', expected day|week|month|year|none",
                other
            ))),
        }
    }

    /// Trend bucket size used when reporting over this filter.
    pub fn granularity(&self) -> Granularity {
        match self {
            DateFilter::Day => Granularity::Hour,
            DateFilter::Year => Granularity::Month,
            _ => Granularity::Day,
        }
    }

    /// Human-readable period name for report headers.
    pub fn describe(&self) -> String {
        const FMT: &str = "%b %d, %Y";
        match self {
            DateFilter::All => "All Time".into(),
            DateFilter::Day => "Today".into(),
            DateFilter::Week => "This Week".into(),
            DateFilter::Month => "This Month".into(),
            DateFilter::Year => "This Year".into(),
            DateFilter::Range { start, end } => match (start, end) {
                (Some(s), Some(e)) => format!(
                    "{} - {}",
                    s.calendar_date().format(FMT),
                    e.calendar_date().format(FMT)
                ),
                (Some(s), None) => format!("Since {}", s.calendar_date().format(FMT)),
                (None, Some(e)) => format!("Until {}", e.calendar_date().format(FMT)),
                (None, None) => "All Time".into(),
            },
        }
    }

    /// Resolve against `now`, which the caller reads exactly once.
    pub fn resolve<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<TimeWindow, EngineError> {
        let tz = now.timezone();
        let now_utc = now.with_timezone(&Utc);
        let today = now.date_naive();
        let window = match self {
            DateFilter::All => TimeWindow::unbounded(),
            DateFilter::Day => TimeWindow {
                start: Bound::Included(local_midnight(&tz, today)?),
                end: Bound::Excluded(now_utc + Duration::hours(24)),
            },
            DateFilter::Week => {
                let back = i64::from(today.weekday().num_days_from_sunday());
                TimeWindow {
                    start: Bound::Included(local_midnight(&tz, today - Duration::days(back))?),
                    end: Bound::Excluded(now_utc + Duration::hours(24)),
                }
            }
            DateFilter::Month => {
                let first = first_of_month(today.year(), today.month())?;
                let next = if today.month() == 12 {
                    first_of_month(today.year() + 1, 1)?
                } else {
                    first_of_month(today.year(), today.month() + 1)?
                };
                TimeWindow {
                    start: Bound::Included(local_midnight(&tz, first)?),
                    end: Bound::Excluded(local_midnight(&tz, next)?),
                }
            }
            DateFilter::Year => TimeWindow {
                start: Bound::Included(local_midnight(&tz, first_of_month(today.year(), 1)?)?),
                end: Bound::Excluded(local_midnight(&tz, first_of_month(today.year() + 1, 1)?)?),
            },
            DateFilter::Range { start, end } => {
                let start = match start {
                    None => Bound::Unbounded,
                    Some(DateBound::Day(d)) => Bound::Included(local_midnight(&tz, *d)?),
                    Some(DateBound::Instant(t)) => Bound::Included(t.with_timezone(&Utc)),
                };
                let end = match end {
                    None => Bound::Unbounded,
                    Some(DateBound::Day(d)) => {
                        let next = d.succ_opt().ok_or_else(|| {
                            EngineError::Validation(format!("End date {} is out of range", d))
                        })?;
                        Bound::Excluded(local_midnight(&tz, next)?)
                    }
                    Some(DateBound::Instant(t)) => Bound::Included(t.with_timezone(&Utc)),
                };
                let window = TimeWindow { start, end };
                if window.is_inverted() {
                    return Err(EngineError::Validation(
                        "Start date must not be after end date".into(),
                    ));
                }
                window
            }
        };
        tracing::debug!(filter = ?self, ?window, "resolved time window");
        Ok(window)
    }
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate, EngineError> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| EngineError::Validation(format!("Date {}-{:02} is out of range", year, month)))
}

/// First instant of `date` in `tz`. If midnight falls in a DST gap, the first
/// valid local time after it is used.
pub fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Result<DateTime<Utc>, EngineError> {
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| EngineError::Validation(format!("No local midnight for {}", date)))?;
    (0..=3)
        .find_map(|h| {
            tz.from_local_datetime(&(midnight + Duration::hours(h)))
                .earliest()
        })
        .map(|d| d.with_timezone(&Utc))
        .ok_or_else(|| EngineError::Validation(format!("No local midnight for {}", date)))
}

/// Half-open or closed UTC interval used to select transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: Bound<DateTime<Utc>>,
    pub end: Bound<DateTime<Utc>>,
}

impl TimeWindow {
    pub fn unbounded() -> Self {
        Self {
            start: Bound::Unbounded,
            end: Bound::Unbounded,
        }
    }

    pub fn contains(&self, t: &DateTime<Utc>) -> bool {
        (self.start, self.end).contains(t)
    }

    fn is_inverted(&self) -> bool {
        match (self.start, self.end) {
            (Bound::Included(s), Bound::Included(e)) => s > e,
            (Bound::Included(s), Bound::Excluded(e)) => s >= e,
            _ => false,
        }
    }
}
