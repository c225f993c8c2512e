//! Loading raw events from the activity service or from a file.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use fl_aw::Client;
use fl_core::RawEvent;

use super::range::TimeRange;
use crate::{Config, RangeArgs};

/// Events loaded for a command, with the range they were selected by.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub events: Vec<RawEvent>,
    /// `None` when a file was read without an explicit `--start/--end`.
    pub range: Option<TimeRange>,
}

/// Loads the events selected by `args`.
///
/// With `--file`, events are read from the file as-is, narrowed to
/// `--start/--end` when those are given. Otherwise they are fetched from the
/// configured activity service for the selected period.
pub fn load_batch(args: &RangeArgs, config: &Config) -> Result<Batch> {
    let now = Utc::now();
    let today = Local::now().date_naive();

    if let Some(path) = &args.file {
        let events = read_events_file(path)?;
        if args.start.is_none() {
            return Ok(Batch {
                events,
                range: None,
            });
        }
        let range = args.resolve(today, now)?;
        return Ok(Batch {
            events: within(events, range),
            range: Some(range),
        });
    }

    let range = args.resolve(today, now)?;
    Ok(Batch {
        events: fetch_events(config, range)?,
        range: Some(range),
    })
}

/// Like [`load_batch`], keeping only the events.
pub fn load_events(args: &RangeArgs, config: &Config) -> Result<Vec<RawEvent>> {
    load_batch(args, config).map(|batch| batch.events)
}

/// Fetches window events for `range` from the activity service.
pub fn fetch_events(config: &Config, range: TimeRange) -> Result<Vec<RawEvent>> {
    let client = Client::new(&config.server_url)
        .context("failed to create activity service client")?
        .with_bucket_prefix(config.bucket_prefix.clone());
    let runtime = tokio::runtime::Runtime::new().context("failed to initialize tokio runtime")?;

    let events = runtime
        .block_on(async {
            match &config.bucket {
                Some(bucket) => client.bucket_events(bucket, range.start, range.end).await,
                None => client.window_events(range.start, range.end).await,
            }
        })
        .with_context(|| format!("failed to fetch events from {}", client.base_url()))?;

    tracing::debug!(count = events.len(), start = %range.start, end = %range.end, "loaded events");
    Ok(events)
}

fn read_events_file(path: &Path) -> Result<Vec<RawEvent>> {
    if path.as_os_str() == "-" {
        return read_events(io::stdin().lock()).context("failed to read events from stdin");
    }
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    read_events(BufReader::new(file))
        .with_context(|| format!("failed to read events from {}", path.display()))
}

/// Parses events from either a JSON array or JSONL (one event per line).
pub fn read_events<R: Read>(mut reader: R) -> Result<Vec<RawEvent>> {
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .context("failed to read input")?;

    if content.trim_start().starts_with('[') {
        return serde_json::from_str(&content).context("invalid JSON event array");
    }

    let mut events = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let event = serde_json::from_str(trimmed)
            .with_context(|| format!("invalid JSON on line {}", idx + 1))?;
        events.push(event);
    }
    Ok(events)
}

fn within(events: Vec<RawEvent>, range: TimeRange) -> Vec<RawEvent> {
    let in_range = |ts: DateTime<Utc>| ts >= range.start && ts < range.end;
    events
        .into_iter()
        .filter(|event| in_range(event.timestamp))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;

    use chrono::TimeZone;

    #[test]
    fn reads_json_array() {
        let input = r#"[
            {"timestamp": "2025-01-15T09:00:00Z", "duration": 120, "data": {"app": "code.exe", "title": ""}},
            {"timestamp": "2025-01-15T09:02:05Z", "duration": 60, "data": {"app": "code.exe", "title": ""}}
        ]"#;
        let events = read_events(Cursor::new(input)).unwrap();
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn reads_jsonl_skipping_blank_lines() {
        let input = concat!(
            r#"{"timestamp": "2025-01-15T09:00:00Z", "duration": 1, "data": {"app": "a"}}"#,
            "\n\n",
            r#"{"timestamp": "2025-01-15T09:00:01Z", "duration": 2, "data": {"app": "b"}}"#,
            "\n",
        );
        let events = read_events(Cursor::new(input)).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].data.app, "b");
    }

    #[test]
    fn reports_bad_line_number() {
        let input = concat!(
            r#"{"timestamp": "2025-01-15T09:00:00Z", "duration": 1, "data": {"app": "a"}}"#,
            "\n",
            "not json\n",
        );
        let err = read_events(Cursor::new(input)).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn empty_input_has_no_events() {
        assert!(read_events(Cursor::new("")).unwrap().is_empty());
    }

    #[test]
    fn within_keeps_half_open_range() {
        let at = |minute| Utc.with_ymd_and_hms(2025, 1, 15, 9, minute, 0).unwrap();
        let events = vec![
            RawEvent::new(at(0), 1.0, "a", ""),
            RawEvent::new(at(30), 1.0, "b", ""),
            RawEvent::new(at(59), 1.0, "c", ""),
        ];
        let kept = within(
            events,
            TimeRange {
                start: at(0),
                end: at(59),
            },
        );
        let apps: Vec<_> = kept.iter().map(|e| e.data.app.as_str()).collect();
        assert_eq!(apps, vec!["a", "b"]);
    }
}
