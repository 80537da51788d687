//! Guest quota bookkeeping.
//!
//! The tracker counts accepted opens against a per-day allowance for
//! unauthenticated users. The counter belongs to a calendar day: any
//! operation observing a later `now` resets it first, so rollover is a
//! property of the data rather than of process lifetime or a midnight
//! timer.
//!
//! Callers increment only for opens whose resolved reason was
//! `guest_today`; override opens and replays of completed items never
//! touch the tracker.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Rolling daily usage counter for guest opens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestQuotaTracker {
    day: NaiveDate,
    used: u32,
    limit: u32,
    suspicious: bool,
}

impl GuestQuotaTracker {
    /// Create a tracker for the given day and daily limit.
    pub fn new(limit: u32, today: NaiveDate) -> Self {
        Self {
            day: today,
            used: 0,
            limit,
            suspicious: false,
        }
    }

    /// Roll the counter forward when `now` is a later calendar day.
    ///
    /// A new day clears both the usage count and the suspicious flag;
    /// days never roll backwards.
    pub fn observe(&mut self, now: NaiveDate) {
        if now > self.day {
            self.day = now;
            self.used = 0;
            self.suspicious = false;
        }
    }

    /// Count one accepted open against today's allowance.
    pub fn record_open(&mut self, now: NaiveDate) {
        self.observe(now);
        self.used = self.used.saturating_add(1);
    }

    /// Collapse the remaining allowance for the current day.
    ///
    /// Driven by the quota store's external suspicious-activity signal.
    pub fn mark_suspicious(&mut self) {
        self.suspicious = true;
    }

    /// Opens left today.
    pub fn remaining(&self) -> u32 {
        if self.suspicious {
            0
        } else {
            self.limit.saturating_sub(self.used)
        }
    }

    /// Whether the daily allowance is exhausted.
    pub fn has_reached_limit(&self) -> bool {
        self.remaining() == 0
    }

    /// Opens counted so far today.
    pub fn used(&self) -> u32 {
        if self.suspicious {
            self.limit
        } else {
            self.used
        }
    }

    /// The daily limit.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// The day the counter currently belongs to.
    pub fn day(&self) -> NaiveDate {
        self.day
    }
}
