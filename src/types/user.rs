//! User entitlement context.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::item::ItemId;

/// Default trailing window (in days) for guest access to dated content.
pub const DEFAULT_GUEST_WINDOW_DAYS: i64 = 7;

/// Entitlement class of the current user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Unauthenticated visitor, quota- and window-limited.
    Guest,
    /// Authenticated user without a paid plan.
    Free,
    /// Paid subscriber.
    Premium,
    /// Top paid plan.
    Pro,
}

impl Tier {
    /// Parse tier from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "guest" => Some(Self::Guest),
            "free" => Some(Self::Free),
            "premium" => Some(Self::Premium),
            "pro" => Some(Self::Pro),
            _ => None,
        }
    }

    /// Whether the tier belongs to an authenticated user.
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Self::Guest)
    }

    /// Whether the tier carries a paid entitlement.
    pub fn is_paid(&self) -> bool {
        matches!(self, Self::Premium | Self::Pro)
    }
}

impl Default for Tier {
    fn default() -> Self {
        Self::Guest
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Guest => write!(f, "guest"),
            Self::Free => write!(f, "free"),
            Self::Premium => write!(f, "premium"),
            Self::Pro => write!(f, "pro"),
        }
    }
}

/// Snapshot of the user state an access decision depends on.
///
/// Built by the caller from the identity provider, the completion store,
/// and the guest quota store. The resolver never reads those collaborators
/// itself, which keeps decisions replayable from their inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserContext {
    /// Entitlement class.
    pub tier: Tier,
    /// Ids of items the user has already completed.
    pub completed_ids: BTreeSet<ItemId>,
    /// Opens counted against today's guest quota.
    pub guest_quota_used: u32,
    /// Trailing window (days) within which a guest may open dated content.
    pub guest_window_days: i64,
}

impl UserContext {
    /// Create a context for the given tier with empty history.
    pub fn new(tier: Tier) -> Self {
        Self {
            tier,
            completed_ids: BTreeSet::new(),
            guest_quota_used: 0,
            guest_window_days: DEFAULT_GUEST_WINDOW_DAYS,
        }
    }

    /// Record completed item ids.
    pub fn with_completed<I, T>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ItemId>,
    {
        self.completed_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Set the opens already counted against today's guest quota.
    pub fn with_quota_used(mut self, used: u32) -> Self {
        self.guest_quota_used = used;
        self
    }

    /// Override the guest trailing window.
    pub fn with_guest_window_days(mut self, days: i64) -> Self {
        self.guest_window_days = days;
        self
    }

    /// Whether the user has completed the given item.
    pub fn has_completed(&self, id: &ItemId) -> bool {
        self.completed_ids.contains(id)
    }
}

impl Default for UserContext {
    fn default() -> Self {
        Self::new(Tier::Guest)
    }
}
