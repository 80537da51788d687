//! Date windows and loaded-range bookkeeping keys.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::fingerprint::fingerprint_hex;

/// A contiguous, inclusive span of calendar days used to batch-load content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRange {
    /// First day of the window, inclusive.
    pub start: NaiveDate,
    /// Last day of the window, inclusive.
    pub end: NaiveDate,
}

impl WindowRange {
    /// Create a window. Swaps the endpoints if given in reverse.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// A single-day window.
    pub fn single(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    /// Whether the given day falls inside the window.
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Number of days covered, at least 1.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Bookkeeping key identifying this window in a loaded set.
    pub fn key(&self) -> RangeKey {
        RangeKey::Window(fingerprint_hex(self))
    }
}

impl fmt::Display for WindowRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Identity of a completed fetch, recorded so the same window or page is
/// never fetched twice.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RangeKey {
    /// A date window, identified by its fingerprint.
    Window(String),
    /// A numbered page in paginated mode.
    Page(u32),
}

impl fmt::Display for RangeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Window(hash) => write!(f, "window:{}", hash),
            Self::Page(n) => write!(f, "page:{}", n),
        }
    }
}
