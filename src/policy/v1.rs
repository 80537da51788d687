//! AccessPolicy v1: named configuration for the entitlement rules.
//!
//! The observed behavior variants of the resolver and the navigation
//! controller are consolidated here as explicit flags instead of
//! copy-paste forks. Callers that need to fingerprint the configuration
//! that produced a decision use [`AccessPolicyV1::params_hash`].

use serde::{Deserialize, Serialize};

use crate::fingerprint::fingerprint_hex;
use crate::DEFAULT_POLICY_VERSION;

/// Where the navigation controller lands when a fresh ordered list arrives.
///
/// Both behaviors exist in production; neither is silently "the" default
/// beyond the named choice below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialPlacement {
    /// Land on index 0 of the ordered list regardless of accessibility.
    MostRecent,
    /// Land on the first index whose access decision is a grant.
    FirstAccessible,
}

impl Default for InitialPlacement {
    fn default() -> Self {
        Self::MostRecent
    }
}

/// Access policy version 1.
///
/// ## Parameters
///
/// - `override_bypasses_future_lock`: whether breaking/featured items are
///   reachable even when dated in the future
/// - `initial_placement`: navigation landing behavior
/// - `guest_daily_limit`: opens per day for unauthenticated users
/// - `free_window_days`: trailing window in which free users may open
///   non-override content without completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessPolicyV1 {
    /// Policy version identifier.
    pub version: String,
    /// Evaluate the override check before the future-date check.
    pub override_bypasses_future_lock: bool,
    /// Navigation landing behavior.
    pub initial_placement: InitialPlacement,
    /// Daily open allowance for guests.
    pub guest_daily_limit: u32,
    /// Trailing window (days) for free-tier access.
    pub free_window_days: i64,
}

impl AccessPolicyV1 {
    /// Create a policy with custom parameters.
    pub fn new(
        override_bypasses_future_lock: bool,
        initial_placement: InitialPlacement,
        guest_daily_limit: u32,
        free_window_days: i64,
    ) -> Self {
        Self {
            version: DEFAULT_POLICY_VERSION.to_string(),
            override_bypasses_future_lock,
            initial_placement,
            guest_daily_limit,
            free_window_days,
        }
    }

    /// Get the policy ID.
    pub fn policy_id(&self) -> &str {
        &self.version
    }

    /// Compute a deterministic hash of the policy parameters.
    ///
    /// Two policies with identical parameters hash identically, so a
    /// decision log can prove which configuration produced it.
    pub fn params_hash(&self) -> String {
        fingerprint_hex(self)
    }
}

impl Default for AccessPolicyV1 {
    fn default() -> Self {
        Self {
            version: DEFAULT_POLICY_VERSION.to_string(),
            override_bypasses_future_lock: true,
            initial_placement: InitialPlacement::default(),
            guest_daily_limit: 5,
            free_window_days: 7,
        }
    }
}
