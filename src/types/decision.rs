//! Access decision values.
//!
//! Decisions are data, not errors: every evaluation returns an
//! `AccessDecision` carrying a closed reason code, and callers branch on
//! the code with exhaustive matches. Nothing on this surface throws.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of explanations an access decision can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    /// The item's date failed normalization.
    InvalidDate,
    /// The item exists in the catalog but has no consumable content yet.
    ComingSoon,
    /// A breaking or featured flag forced accessibility.
    Override,
    /// The item is dated in the future.
    FutureLocked,
    /// The item is older than the guest trailing window.
    GuestWindowExceeded,
    /// The guest's daily quota is exhausted.
    GuestQuotaReached,
    /// Guest access granted; an accepted open counts against the quota.
    GuestToday,
    /// Premium or pro entitlement grants access.
    PremiumAccess,
    /// Free-tier access via today's item, completion, or the free window.
    FreeUserAllowed,
    /// Outside the free window and not completed; a paid plan is required.
    PremiumRequired,
}

impl ReasonCode {
    /// Whether this reason accompanies a granted decision.
    pub fn is_grant(&self) -> bool {
        matches!(
            self,
            Self::Override | Self::GuestToday | Self::PremiumAccess | Self::FreeUserAllowed
        )
    }

    /// Whether an accepted open with this reason consumes guest quota.
    ///
    /// Only `GuestToday` does: override opens and replays of completed
    /// items never count against the daily allowance.
    pub fn consumes_guest_quota(&self) -> bool {
        matches!(self, Self::GuestToday)
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::InvalidDate => "invalid_date",
            Self::ComingSoon => "coming_soon",
            Self::Override => "override",
            Self::FutureLocked => "future_locked",
            Self::GuestWindowExceeded => "guest_window_exceeded",
            Self::GuestQuotaReached => "guest_quota_reached",
            Self::GuestToday => "guest_today",
            Self::PremiumAccess => "premium_access",
            Self::FreeUserAllowed => "free_user_allowed",
            Self::PremiumRequired => "premium_required",
        };
        write!(f, "{}", s)
    }
}

/// Result of resolving access for one item.
///
/// An immutable value with no side effects. Recomputing with identical
/// inputs always yields an identical decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessDecision {
    /// Whether the item may be opened right now.
    pub accessible: bool,
    /// Why.
    pub reason: ReasonCode,
}

impl AccessDecision {
    /// Construct a granted decision.
    ///
    /// Debug-asserts that the reason is a grant reason, so a mismatched
    /// pair cannot be built silently in tests.
    pub fn grant(reason: ReasonCode) -> Self {
        debug_assert!(reason.is_grant(), "grant with deny reason {reason}");
        Self {
            accessible: true,
            reason,
        }
    }

    /// Construct a denied decision.
    pub fn deny(reason: ReasonCode) -> Self {
        debug_assert!(!reason.is_grant(), "deny with grant reason {reason}");
        Self {
            accessible: false,
            reason,
        }
    }
}

impl fmt::Display for AccessDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({})",
            if self.accessible { "grant" } else { "deny" },
            self.reason
        )
    }
}
