//! Timeline aggregation.
//!
//! Collapses a batch of window-focus events into activity blocks for
//! timeline rendering and statistics.
//!
//! # Algorithm Summary
//!
//! 1. Drop short focus periods of OS-chrome processes (system noise)
//! 2. Sort the survivors by start instant
//! 3. Scan left to right with one open block: merge events of the same
//!    category or app across small gaps, absorb short distractions, and seal
//!    the block on a context switch
//! 4. Prune sealed blocks that are still too short to matter

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, trace};

use crate::app_name::clean_app_name;
use crate::category::{Category, categorize};
use crate::event::RawEvent;

/// Process names considered OS chrome. Matched as substrings of the cleaned
/// app name, case-sensitively.
pub const SYSTEM_APPS: [&str; 5] = [
    "ShellExperienceHost",
    "RuntimeBroker",
    "explorer.exe",
    "SearchApp",
    "LockApp",
];

/// System-app events must last strictly longer than this (seconds) to be kept.
pub const IGNORE_DURATION_THRESHOLD: f64 = 30.0;

/// Largest gap (exclusive, whole seconds) across which events are merged or
/// absorbed.
pub const MERGE_GAP_THRESHOLD: i64 = 10;

/// Events shorter than this (seconds) are absorbed; sealed blocks shorter
/// than this are pruned.
pub const MIN_BLOCK_DURATION: f64 = 10.0;

/// Name normalization and categorization used by the aggregator.
///
/// Implementations must be pure: the same input always yields the same
/// output.
pub trait AppClassifier {
    /// Normalizes a raw process identifier into a non-empty display name.
    fn clean_app_name(&self, raw: &str) -> String;

    /// Classifies a cleaned app name given its window title.
    fn categorize(&self, app: &str, title: &str) -> Category;
}

impl<T: AppClassifier + ?Sized> AppClassifier for &T {
    fn clean_app_name(&self, raw: &str) -> String {
        (**self).clean_app_name(raw)
    }

    fn categorize(&self, app: &str, title: &str) -> Category {
        (**self).categorize(app, title)
    }
}

/// Classifier backed by the built-in display-name and keyword tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultClassifier;

impl AppClassifier for DefaultClassifier {
    fn clean_app_name(&self, raw: &str) -> String {
        clean_app_name(raw)
    }

    fn categorize(&self, app: &str, title: &str) -> Category {
        categorize(app, title)
    }
}

/// A span of activity with a single dominant category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityBlock {
    /// Category of the event that opened the block.
    pub category: Category,
    /// Start of the first event.
    pub start: DateTime<Utc>,
    /// End of the last merged or absorbed event.
    pub end: DateTime<Utc>,
    /// Accumulated seconds: event durations plus every gap folded in by a
    /// merge or absorption. Not necessarily `end - start`.
    pub duration: f64,
    /// Distinct cleaned app names that opened or merged into the block.
    /// Absorbed events are not listed.
    pub apps: BTreeSet<String>,
    /// App of the event that opened the block.
    pub primary_app: String,
}

impl ActivityBlock {
    fn open(event: &RawEvent, app: String, category: Category) -> Self {
        Self {
            category,
            start: event.start(),
            end: event.end(),
            duration: event.duration,
            apps: BTreeSet::from([app.clone()]),
            primary_app: app,
        }
    }

    /// Extends the block through `event`, folding `gap` into the duration.
    #[allow(clippy::cast_precision_loss)]
    fn extend(&mut self, event: &RawEvent, gap: i64) {
        self.end = event.end();
        self.duration += event.duration + gap as f64;
    }
}

/// Aggregates raw focus events into activity blocks.
///
/// Pure and deterministic for a pure `classifier`; events may be given in
/// any order. The result is chronological and every block lasts at least
/// [`MIN_BLOCK_DURATION`] seconds.
pub fn aggregate<C: AppClassifier + ?Sized>(
    events: &[RawEvent],
    classifier: &C,
) -> Vec<ActivityBlock> {
    let mut kept: Vec<&RawEvent> = events
        .iter()
        .filter(|event| !is_system_noise(event, classifier))
        .collect();
    if kept.is_empty() {
        debug!(input = events.len(), "no events left after noise filter");
        return Vec::new();
    }

    kept.sort_by_key(|event| event.start());
    let kept_count = kept.len();

    let (open, mut sealed) = kept.into_iter().fold(
        (None, Vec::new()),
        |(current, mut sealed): (Option<ActivityBlock>, Vec<ActivityBlock>), event| {
            let next = scan(current, event, classifier, &mut sealed);
            (Some(next), sealed)
        },
    );
    sealed.extend(open);

    let before_prune = sealed.len();
    sealed.retain(|block| {
        let keep = block.duration >= MIN_BLOCK_DURATION;
        if !keep {
            trace!(category = %block.category, duration = block.duration, "pruning short block");
        }
        keep
    });

    debug!(
        input = events.len(),
        kept = kept_count,
        sealed = before_prune,
        blocks = sealed.len(),
        "aggregated timeline"
    );
    sealed
}

fn is_system_noise<C: AppClassifier + ?Sized>(event: &RawEvent, classifier: &C) -> bool {
    let app = classifier.clean_app_name(&event.data.app);
    let is_system = SYSTEM_APPS.iter().any(|system| app.contains(system));
    let noise = is_system && event.duration <= IGNORE_DURATION_THRESHOLD;
    if noise {
        trace!(%app, duration = event.duration, "filtering system app");
    }
    noise
}

/// One step of the scan: returns the block that stays open after `event`,
/// pushing the previous block to `sealed` on a context switch.
fn scan<C: AppClassifier + ?Sized>(
    current: Option<ActivityBlock>,
    event: &RawEvent,
    classifier: &C,
    sealed: &mut Vec<ActivityBlock>,
) -> ActivityBlock {
    let app = classifier.clean_app_name(&event.data.app);
    let category = classifier.categorize(&app, &event.data.title);

    let Some(mut block) = current else {
        return ActivityBlock::open(event, app, category);
    };

    let gap = gap_seconds(block.end, event.start());
    let related = block.category == category || block.apps.contains(&app);

    if related && gap < MERGE_GAP_THRESHOLD {
        trace!(%app, gap, category = %block.category, "merging into block");
        block.extend(event, gap);
        block.apps.insert(app);
        block
    } else if event.duration < MIN_BLOCK_DURATION && gap < MERGE_GAP_THRESHOLD {
        trace!(%app, gap, duration = event.duration, category = %block.category, "absorbing micro-event");
        block.extend(event, gap);
        block
    } else {
        trace!(%app, gap, %category, "context switch, sealing block");
        sealed.push(block);
        ActivityBlock::open(event, app, category)
    }
}

/// Whole seconds from `end` to `start`, truncated toward zero. Both instants
/// are already at millisecond precision. Negative when the event overlaps the
/// block.
fn gap_seconds(end: DateTime<Utc>, start: DateTime<Utc>) -> i64 {
    (start - end).num_seconds()
}
