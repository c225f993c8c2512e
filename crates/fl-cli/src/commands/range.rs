//! Time ranges for fetching events.
//!
//! Named periods (`--day`, `--last-day`, `--week`, `--last-week`) are
//! half-open intervals between local midnights; `--start/--end` give an
//! explicit range.

use anyhow::{Result, bail};
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};

use super::util::parse_datetime;
use crate::RangeArgs;

/// Named period relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Day,
    LastDay,
    Week,
    LastWeek,
}

/// Half-open interval `[start, end)` of events to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    /// Length of the range in whole days, rounded to the nearest day so DST
    /// transitions do not add one. At least 1.
    pub fn days(&self) -> u32 {
        const DAY: i64 = 86_400;
        let seconds = (self.end - self.start).num_seconds().max(0);
        u32::try_from((seconds + DAY / 2) / DAY)
            .unwrap_or(u32::MAX)
            .max(1)
    }
}

impl RangeArgs {
    /// The named period selected by the flags, defaulting to today.
    pub const fn period(&self) -> Period {
        if self.last_day {
            Period::LastDay
        } else if self.week {
            Period::Week
        } else if self.last_week {
            Period::LastWeek
        } else {
            Period::Day
        }
    }

    /// Resolves the flags to a concrete range.
    pub fn resolve(&self, today: NaiveDate, now: DateTime<Utc>) -> Result<TimeRange> {
        let (start, end) = match (&self.start, &self.end) {
            (Some(start), Some(end)) => (parse_datetime(start, now)?, parse_datetime(end, now)?),
            (None, None) => get_period_boundaries(self.period(), today),
            _ => bail!("--start and --end must be given together"),
        };
        if end <= start {
            bail!("range end ({end}) must be after start ({start})");
        }
        Ok(TimeRange { start, end })
    }
}

/// Converts a local date at midnight to UTC.
/// Handles DST ambiguity by picking the earlier time.
fn local_midnight_to_utc(local_date: NaiveDate) -> DateTime<Utc> {
    let midnight = local_date.and_time(NaiveTime::MIN);
    Local
        .from_local_datetime(&midnight)
        .earliest()
        // DST spring-forward gap at midnight: 1am local always exists
        .or_else(|| {
            Local
                .from_local_datetime(&(midnight + Duration::hours(1)))
                .earliest()
        })
        .map_or_else(|| midnight.and_utc(), |dt| dt.with_timezone(&Utc))
}

fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Get boundaries for a given period, using the provided date as reference.
pub fn get_period_boundaries(period: Period, today: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let (first, last) = match period {
        Period::Day => (today, today + Duration::days(1)),
        Period::LastDay => (today - Duration::days(1), today),
        Period::Week => {
            let monday = monday_of(today);
            (monday, monday + Duration::days(7))
        }
        Period::LastWeek => {
            let monday = monday_of(today);
            (monday - Duration::days(7), monday)
        }
    };
    (local_midnight_to_utc(first), local_midnight_to_utc(last))
}
