use std::time::{SystemTime, UNIX_EPOCH};

use crate::{FormParams, Timestamp};

/// Length of the window used when `start` is omitted: 24 hours.
pub const DEFAULT_WINDOW_SECS: i64 = 60 * 60 * 24;

/// Current wall-clock time in Unix epoch seconds.
pub fn unix_now() -> Timestamp {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as Timestamp)
        .unwrap_or_default()
}

/// Resolved `start`/`end` pair in epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl TimeRange {
    /// Fill missing bounds relative to `now`.
    ///
    /// `end` defaults to `now` and `start` to `now - 24h`. Each default is applied
    /// independently, and the resulting order is not checked.
    pub fn resolve(start: Option<Timestamp>, end: Option<Timestamp>, now: Timestamp) -> Self {
        Self {
            start: start.unwrap_or(now - DEFAULT_WINDOW_SECS),
            end: end.unwrap_or(now),
        }
    }

    /// Write `start` and `end` into `params`.
    pub fn apply(&self, params: &mut FormParams) {
        params.set("start", self.start);
        params.set("end", self.end);
    }
}
