//! Raw window-focus events from the activity service.

use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// One foreground-window focus period.
///
/// The activity service guarantees well-formed events: `duration` is finite
/// and non-negative. Nothing in this crate re-checks that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    /// When the window gained focus.
    pub timestamp: DateTime<Utc>,
    /// How long the window kept focus, in seconds.
    pub duration: f64,
    /// Window details.
    #[serde(default)]
    pub data: EventData,
}

/// Application and window title of a focus event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventData {
    /// Raw process identifier, e.g. `code.exe`.
    #[serde(default)]
    pub app: String,
    /// Window title, possibly empty.
    #[serde(default)]
    pub title: String,
}

impl RawEvent {
    /// Creates an event for the given app and window title.
    pub fn new(
        timestamp: DateTime<Utc>,
        duration: f64,
        app: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            duration,
            data: EventData {
                app: app.into(),
                title: title.into(),
            },
        }
    }

    /// Start instant of the event, truncated to whole milliseconds.
    pub fn start(&self) -> DateTime<Utc> {
        self.timestamp.trunc_subsecs(3)
    }

    /// End instant, `start + duration`, at millisecond precision.
    ///
    /// Saturates at `DateTime::<Utc>::MAX_UTC` when the duration runs past
    /// the representable range.
    #[allow(clippy::cast_possible_truncation)]
    pub fn end(&self) -> DateTime<Utc> {
        TimeDelta::try_milliseconds((self.duration * 1000.0) as i64)
            .and_then(|elapsed| self.start().checked_add_signed(elapsed))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}
