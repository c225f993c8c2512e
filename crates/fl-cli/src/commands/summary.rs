//! Summary command: where the time went.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use chrono::Local;
use fl_core::DefaultClassifier;
use fl_core::summary::{DAILY_TARGET_SECONDS, DaySummary, days_spanned};

use super::source::Batch;
use super::util::format_seconds;

/// Apps listed in the human-readable summary.
const MAX_APPS: usize = 5;

/// Summarizes `batch` (hours in local time) and writes it as text or JSON.
///
/// Averages are taken over the days of the batch's range, or over the days
/// its events span when it has no range.
pub fn run<W: Write>(writer: &mut W, batch: &Batch, json: bool) -> Result<()> {
    let days = batch
        .range
        .map_or_else(|| days_spanned(&batch.events, &Local), |range| range.days());
    let summary = DaySummary::from_events(&batch.events, &DefaultClassifier, &Local, days);

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&summary)?)?;
    } else {
        write!(writer, "{}", format_summary(&summary))?;
    }
    Ok(())
}

/// Formats a summary for the terminal.
pub fn format_summary(summary: &DaySummary) -> String {
    if summary.block_count == 0 && summary.apps.is_empty() {
        return "No activity recorded.\n".to_string();
    }

    let mut output = String::new();
    let noun = if summary.block_count == 1 {
        "block"
    } else {
        "blocks"
    };
    let _ = writeln!(
        output,
        "Tracked {} across {} {noun}",
        format_seconds(summary.total_seconds),
        summary.block_count
    );
    let _ = writeln!(
        output,
        "Daily average {} ({}% of {} target)",
        format_seconds(summary.daily_average),
        summary.target_percent,
        format_seconds(DAILY_TARGET_SECONDS)
    );
    match summary.best_hour {
        Some(hour) => {
            let _ = writeln!(output, "Most productive hour: {hour:02}:00");
        }
        None => {
            let _ = writeln!(output, "Most productive hour: n/a");
        }
    }

    let _ = writeln!(output, "\nCategories:");
    for share in &summary.categories {
        let _ = writeln!(
            output,
            "  {:<13} {:>7}  {:>3}%",
            share.category,
            format_seconds(share.seconds),
            share.percent
        );
    }

    let _ = writeln!(output, "\nTop apps:");
    for share in summary.apps.iter().take(MAX_APPS) {
        let _ = writeln!(
            output,
            "  {:<22} {:>7}  {:>3}%",
            share.app,
            format_seconds(share.seconds),
            share.percent
        );
    }

    let _ = writeln!(output, "\nHourly focus:");
    for hour in &summary.hourly {
        let bar = "#".repeat((hour.score / 10) as usize);
        let line = format!("  {:02}:00  {:>4}m  {bar}", hour.hour, hour.minutes);
        let _ = writeln!(output, "{}", line.trim_end());
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{DateTime, Duration, TimeZone, Utc};
    use fl_core::RawEvent;
    use insta::assert_snapshot;

    use crate::commands::range::TimeRange;

    fn ts(seconds: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 10, 0, 0).unwrap() + Duration::seconds(seconds)
    }

    fn sample_events() -> Vec<RawEvent> {
        vec![
            RawEvent::new(ts(0), 3000.0, "code.exe", "main.rs"),
            RawEvent::new(ts(3005), 600.0, "code.exe", "lib.rs"),
            RawEvent::new(ts(3700), 300.0, "chrome.exe", "docs.rs"),
            RawEvent::new(ts(4100), 900.0, "windowsterminal.exe", "cargo"),
        ]
    }

    #[test]
    fn format_summary_shows_all_sections() {
        let summary = DaySummary::from_events(&sample_events(), &DefaultClassifier, &Utc, 1);
        let output = format_summary(&summary);
        assert_snapshot!(output, @r"
        Tracked 1h 20m across 3 blocks
        Daily average 1h 20m (17% of 8h 0m target)
        Most productive hour: 10:00

        Categories:
          Code            1h 0m   75%
          Admin          15m 0s   19%
          Browsing        5m 0s    6%

        Top apps:
          Visual Studio Code       1h 0m   75%
          Windowsterminal         15m 0s   19%
          Google Chrome            5m 0s    6%

        Hourly focus:
          09:00     0m
          10:00    60m  ##########
          11:00    20m  ###
          12:00     0m
          13:00     0m
          14:00     0m
          15:00     0m
          16:00     0m
          17:00     0m
        ");
    }

    #[test]
    fn format_summary_empty() {
        let summary = DaySummary::from_events(&[], &DefaultClassifier, &Utc, 1);
        assert_eq!(format_summary(&summary), "No activity recorded.\n");
    }

    #[test]
    fn format_summary_over_a_week_without_work_hours() {
        // 20:00 UTC falls outside the work hours.
        let events = vec![RawEvent::new(ts(36_000), 3600.0, "code.exe", "")];
        let summary = DaySummary::from_events(&events, &DefaultClassifier, &Utc, 7);

        let output = format_summary(&summary);
        let header: Vec<&str> = output.lines().take(3).collect();

        assert_eq!(
            header,
            vec![
                "Tracked 1h 0m across 1 block",
                "Daily average 8m 34s (2% of 8h 0m target)",
                "Most productive hour: n/a",
            ]
        );
    }

    #[test]
    fn run_json_outputs_summary_object() {
        let batch = Batch {
            events: sample_events(),
            range: None,
        };
        let mut output = Vec::new();
        run(&mut output, &batch, true).unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(parsed["block_count"], 3);
        assert_eq!(parsed["total_seconds"], 4800.0);
        assert_eq!(parsed["categories"][0]["category"], "Code");
        assert_eq!(parsed["apps"][0]["app"], "Visual Studio Code");
        assert_eq!(parsed["hourly"].as_array().unwrap().len(), 9);
    }

    #[test]
    fn run_averages_over_range_days() {
        let batch = Batch {
            events: sample_events(),
            range: Some(TimeRange {
                start: ts(-36_000),
                end: ts(-36_000) + Duration::days(4),
            }),
        };
        let mut output = Vec::new();
        run(&mut output, &batch, true).unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(parsed["days"], 4);
        assert_eq!(parsed["daily_average"], 1200.0);
    }
}
