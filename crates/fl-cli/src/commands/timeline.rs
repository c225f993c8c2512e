//! Timeline command: aggregated activity blocks.

use std::fmt::{Display, Write as _};
use std::io::Write;

use anyhow::Result;
use chrono::{Local, TimeZone};
use fl_core::{ActivityBlock, DefaultClassifier, RawEvent, aggregate};

use super::util::format_seconds;

/// Aggregates `events` and writes the timeline in local time or as JSON.
pub fn run<W: Write>(writer: &mut W, events: &[RawEvent], json: bool) -> Result<()> {
    let blocks = aggregate(events, &DefaultClassifier);

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&blocks)?)?;
    } else {
        write!(writer, "{}", format_timeline(&blocks, &Local))?;
    }
    Ok(())
}

/// Formats blocks as a human-readable table with times in `tz`.
pub fn format_timeline<Tz>(blocks: &[ActivityBlock], tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if blocks.is_empty() {
        return "No activity blocks.\n".to_string();
    }

    let mut output = String::new();
    let noun = if blocks.len() == 1 { "block" } else { "blocks" };
    let _ = writeln!(output, "Timeline ({} {noun})", blocks.len());
    let _ = writeln!(output);

    for block in blocks {
        let start = block.start.with_timezone(tz).format("%H:%M");
        let end = block.end.with_timezone(tz).format("%H:%M");
        let line = format!(
            "  {start}-{end}  {:<13} {:>7}  {}",
            block.category,
            format_seconds(block.duration),
            format_apps(block),
        );
        let _ = writeln!(output, "{}", line.trim_end());
    }
    output
}

/// Primary app first, then the other contributors.
fn format_apps(block: &ActivityBlock) -> String {
    let others: Vec<&str> = block
        .apps
        .iter()
        .map(String::as_str)
        .filter(|app| *app != block.primary_app)
        .collect();
    if others.is_empty() {
        block.primary_app.clone()
    } else {
        format!("{} (+ {})", block.primary_app, others.join(", "))
    }
}
