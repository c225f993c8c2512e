//! Events command for dumping raw window events.
//!
//! Outputs events as JSONL, which `--file` accepts back as input.

use std::io::Write;

use anyhow::Result;
use fl_core::RawEvent;

/// Writes `events` as JSONL, oldest first.
pub fn run<W: Write>(writer: &mut W, events: &[RawEvent]) -> Result<()> {
    let mut sorted: Vec<&RawEvent> = events.iter().collect();
    sorted.sort_by_key(|event| event.timestamp);

    for event in sorted {
        let json = serde_json::to_string(event)?;
        writeln!(writer, "{json}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{TimeZone, Utc};
    use insta::assert_snapshot;

    #[test]
    fn events_are_written_in_order() {
        let at = |minute| Utc.with_ymd_and_hms(2025, 1, 15, 9, minute, 0).unwrap();
        let events = vec![
            RawEvent::new(at(5), 30.0, "chrome.exe", "docs"),
            RawEvent::new(at(0), 12.5, "code.exe", "main.rs"),
        ];

        let mut output = Vec::new();
        run(&mut output, &events).unwrap();

        assert_snapshot!(String::from_utf8(output).unwrap(), @r#"
        {"timestamp":"2025-01-15T09:00:00Z","duration":12.5,"data":{"app":"code.exe","title":"main.rs"}}
        {"timestamp":"2025-01-15T09:05:00Z","duration":30.0,"data":{"app":"chrome.exe","title":"docs"}}
        "#);
    }
}
