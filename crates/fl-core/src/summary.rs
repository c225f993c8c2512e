//! Breakdowns of a batch of activity for dashboards and reports.

use std::collections::HashMap;

use chrono::{TimeZone, Timelike};
use serde::Serialize;

use crate::category::Category;
use crate::event::RawEvent;
use crate::timeline::{ActivityBlock, AppClassifier, aggregate};

/// First and last local hour covered by [`hourly_focus`].
pub const WORK_HOURS: (u32, u32) = (9, 17);

/// Tracked time per day counted as a full day's work.
pub const DAILY_TARGET_SECONDS: f64 = 8.0 * 3600.0;

/// Time attributed to one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: Category,
    pub seconds: f64,
    /// Rounded percentage of all block time.
    pub percent: u32,
}

/// Time spent in one application.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppShare {
    pub app: String,
    pub seconds: f64,
    /// Rounded percentage of all event time.
    pub percent: u32,
}

/// Focus within one local hour of the working day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourlyFocus {
    /// Hour of day, 0-23.
    pub hour: u32,
    /// Rounded minutes of events starting in this hour.
    pub minutes: u32,
    /// 0-100, where 100 means a fully focused hour.
    pub score: u32,
}

/// Everything the summary view shows for a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    /// Sum of raw event durations.
    pub total_seconds: f64,
    /// Number of days the batch covers, at least 1.
    pub days: u32,
    /// `total_seconds` spread evenly over `days`.
    pub daily_average: f64,
    /// Rounded share of [`DAILY_TARGET_SECONDS`] reached by the daily
    /// average, capped at 100.
    pub target_percent: u32,
    /// Number of activity blocks after aggregation.
    pub block_count: usize,
    pub categories: Vec<CategoryShare>,
    pub apps: Vec<AppShare>,
    pub hourly: Vec<HourlyFocus>,
    /// Work hour with the highest focus score, if any hour saw activity.
    pub best_hour: Option<u32>,
}

impl DaySummary {
    /// Builds the summary of `events` covering `days` days, bucketing hours
    /// in `tz`. A `days` of 0 is treated as 1.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_events<C, Tz>(events: &[RawEvent], classifier: &C, tz: &Tz, days: u32) -> Self
    where
        C: AppClassifier + ?Sized,
        Tz: TimeZone,
    {
        let blocks = aggregate(events, classifier);
        let days = days.max(1);
        let total_seconds: f64 = events.iter().map(|event| event.duration).sum();
        let daily_average = total_seconds / f64::from(days);
        let hourly = hourly_focus(events, tz);

        Self {
            total_seconds,
            days,
            daily_average,
            target_percent: ((daily_average / DAILY_TARGET_SECONDS) * 100.0)
                .round()
                .min(100.0) as u32,
            block_count: blocks.len(),
            categories: category_breakdown(&blocks),
            apps: app_usage(events, classifier),
            best_hour: best_hour(&hourly),
            hourly,
        }
    }
}

/// Number of local calendar days from the first to the last event,
/// inclusive. An empty batch covers one day.
pub fn days_spanned<Tz: TimeZone>(events: &[RawEvent], tz: &Tz) -> u32 {
    let dates = events
        .iter()
        .map(|event| event.timestamp.with_timezone(tz).date_naive());
    let (Some(first), Some(last)) = (dates.clone().min(), dates.max()) else {
        return 1;
    };
    u32::try_from((last - first).num_days() + 1).unwrap_or(u32::MAX)
}

/// Hour with the highest focus score. Ties go to the earlier hour; hours
/// without activity never win.
pub fn best_hour(hourly: &[HourlyFocus]) -> Option<u32> {
    hourly
        .iter()
        .filter(|focus| focus.score > 0)
        .fold(None, |best: Option<&HourlyFocus>, focus| match best {
            Some(current) if current.score >= focus.score => Some(current),
            _ => Some(focus),
        })
        .map(|focus| focus.hour)
}

/// Total block time per category, longest first.
pub fn category_breakdown(blocks: &[ActivityBlock]) -> Vec<CategoryShare> {
    let mut totals: HashMap<Category, f64> = HashMap::new();
    for block in blocks {
        *totals.entry(block.category).or_insert(0.0) += block.duration;
    }
    let total: f64 = totals.values().sum();

    let mut shares: Vec<_> = totals
        .into_iter()
        .map(|(category, seconds)| CategoryShare {
            category,
            seconds,
            percent: percent_of(seconds, total),
        })
        .collect();
    shares.sort_by(|a, b| {
        b.seconds
            .total_cmp(&a.seconds)
            .then_with(|| a.category.cmp(&b.category))
    });
    shares
}

/// Total raw event time per cleaned app name, longest first.
pub fn app_usage<C: AppClassifier + ?Sized>(
    events: &[RawEvent],
    classifier: &C,
) -> Vec<AppShare> {
    let mut totals: HashMap<String, f64> = HashMap::new();
    for event in events {
        let app = classifier.clean_app_name(&event.data.app);
        *totals.entry(app).or_insert(0.0) += event.duration;
    }
    let total: f64 = totals.values().sum();

    let mut shares: Vec<_> = totals
        .into_iter()
        .map(|(app, seconds)| AppShare {
            percent: percent_of(seconds, total),
            app,
            seconds,
        })
        .collect();
    shares.sort_by(|a, b| b.seconds.total_cmp(&a.seconds).then_with(|| a.app.cmp(&b.app)));
    shares
}

/// Focus per working hour, keyed by the local hour each event starts in.
///
/// Event time is not split across hour boundaries.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn hourly_focus<Tz: TimeZone>(events: &[RawEvent], tz: &Tz) -> Vec<HourlyFocus> {
    let (first, last) = WORK_HOURS;
    let mut seconds = [0.0_f64; 24];
    for event in events {
        let hour = event.timestamp.with_timezone(tz).hour() as usize;
        seconds[hour] += event.duration;
    }

    (first..=last)
        .map(|hour| {
            let secs = seconds[hour as usize];
            HourlyFocus {
                hour,
                minutes: (secs / 60.0).round() as u32,
                score: ((secs / 3600.0) * 100.0).round().min(100.0) as u32,
            }
        })
        .collect()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn percent_of(part: f64, total: f64) -> u32 {
    if total > 0.0 {
        ((part / total) * 100.0).round() as u32
    } else {
        0
    }
}
