use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Half-open UTC interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    #[inline]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Overlap of two windows, `None` when they do not overlap
    pub fn intersect(&self, other: &TimeWindow) -> Option<TimeWindow> {
        let window = TimeWindow::new(self.start.max(other.start), self.end.min(other.end));
        (!window.is_empty()).then_some(window)
    }
}

/// Position of a requested window relative to "now".
///
/// Each variant selects a distinct composition path: elapsed windows are
/// fully materialized, upcoming windows are only projected, and a straddling
/// window does both on its two halves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPhase {
    Elapsed(TimeWindow),
    Upcoming(TimeWindow),
    Straddling {
        elapsed: TimeWindow,
        upcoming: TimeWindow,
    },
}

impl WindowPhase {
    pub fn classify(window: TimeWindow, now: DateTime<Utc>) -> Self {
        if window.end <= now {
            WindowPhase::Elapsed(window)
        } else if window.start >= now {
            WindowPhase::Upcoming(window)
        } else {
            WindowPhase::Straddling {
                elapsed: TimeWindow::new(window.start, now),
                upcoming: TimeWindow::new(now, window.end),
            }
        }
    }

    /// The full window that was classified
    pub fn window(&self) -> TimeWindow {
        match self {
            WindowPhase::Elapsed(window) | WindowPhase::Upcoming(window) => *window,
            WindowPhase::Straddling { elapsed, upcoming } => {
                TimeWindow::new(elapsed.start, upcoming.end)
            }
        }
    }
}
