//! Pure access resolution.
//!
//! `resolve_access` is a query, never a command: it reads its four inputs
//! and returns a decision value. Callers that accept an "open" action
//! decide from the returned reason whether to touch the quota tracker.

use chrono::{Duration, NaiveDate};

use crate::types::{AccessDecision, Item, ReasonCode, Tier, UserContext};

use super::v1::AccessPolicyV1;

/// Resolve whether `item` may be opened at `now` by `user`.
///
/// Checks run in strict order; the first match wins:
///
/// 1. unparseable date
/// 2. no consumable content
/// 3. breaking/featured override (before the future check when
///    `policy.override_bypasses_future_lock`, after it otherwise)
/// 4. future-dated lock
/// 5. guest trailing window, then guest quota
/// 6. paid tiers
/// 7. free tier: today, completed, or within the free window
///
/// Identical inputs always produce identical output; `now` is an explicit
/// input, never a hidden clock read.
pub fn resolve_access(
    item: &Item,
    now: NaiveDate,
    user: &UserContext,
    policy: &AccessPolicyV1,
) -> AccessDecision {
    let date = match item.date {
        Some(d) => d,
        None => return AccessDecision::deny(ReasonCode::InvalidDate),
    };

    if !item.has_content {
        return AccessDecision::deny(ReasonCode::ComingSoon);
    }

    if policy.override_bypasses_future_lock {
        if item.is_override() {
            return AccessDecision::grant(ReasonCode::Override);
        }
        if date > now {
            return AccessDecision::deny(ReasonCode::FutureLocked);
        }
    } else {
        if date > now {
            return AccessDecision::deny(ReasonCode::FutureLocked);
        }
        if item.is_override() {
            return AccessDecision::grant(ReasonCode::Override);
        }
    }

    match user.tier {
        Tier::Guest => {
            if date < now - Duration::days(user.guest_window_days) {
                return AccessDecision::deny(ReasonCode::GuestWindowExceeded);
            }
            if user.guest_quota_used >= policy.guest_daily_limit && !user.has_completed(&item.id) {
                return AccessDecision::deny(ReasonCode::GuestQuotaReached);
            }
            AccessDecision::grant(ReasonCode::GuestToday)
        }
        Tier::Premium | Tier::Pro => AccessDecision::grant(ReasonCode::PremiumAccess),
        Tier::Free => {
            let within_window = date >= now - Duration::days(policy.free_window_days);
            if date == now || user.has_completed(&item.id) || within_window {
                AccessDecision::grant(ReasonCode::FreeUserAllowed)
            } else {
                AccessDecision::deny(ReasonCode::PremiumRequired)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn now() -> NaiveDate {
        day(2025, 6, 14)
    }

    fn item(date: Option<NaiveDate>) -> Item {
        Item::new("item_001", date)
    }

    #[test]
    fn test_invalid_date_wins_over_everything() {
        let it = item(None).breaking(true);
        let user = UserContext::new(Tier::Pro);
        let d = resolve_access(&it, now(), &user, &AccessPolicyV1::default());
        assert_eq!(d, AccessDecision::deny(ReasonCode::InvalidDate));
    }

    #[test]
    fn test_coming_soon_before_override() {
        let it = item(Some(now())).breaking(true).with_content(false);
        let user = UserContext::new(Tier::Premium);
        let d = resolve_access(&it, now(), &user, &AccessPolicyV1::default());
        assert_eq!(d, AccessDecision::deny(ReasonCode::ComingSoon));
    }

    #[test]
    fn test_override_reaches_future_items() {
        let it = item(Some(day(2025, 6, 21))).breaking(true);
        for tier in [Tier::Guest, Tier::Free, Tier::Premium, Tier::Pro] {
            let user = UserContext::new(tier);
            let d = resolve_access(&it, now(), &user, &AccessPolicyV1::default());
            assert_eq!(d, AccessDecision::grant(ReasonCode::Override), "{tier}");
        }
    }

    #[test]
    fn test_future_lock_wins_when_bypass_disabled() {
        let mut policy = AccessPolicyV1::default();
        policy.override_bypasses_future_lock = false;

        let it = item(Some(day(2025, 6, 21))).breaking(true);
        let user = UserContext::new(Tier::Pro);
        let d = resolve_access(&it, now(), &user, &policy);
        assert_eq!(d, AccessDecision::deny(ReasonCode::FutureLocked));

        // Past-dated override items stay reachable either way.
        let past = item(Some(day(2025, 6, 1))).featured(true);
        let d = resolve_access(&past, now(), &user, &policy);
        assert_eq!(d, AccessDecision::grant(ReasonCode::Override));
    }

    #[test]
    fn test_future_locked_for_plain_items() {
        let it = item(Some(day(2025, 6, 21)));
        for tier in [Tier::Guest, Tier::Free, Tier::Premium, Tier::Pro] {
            let user = UserContext::new(tier);
            let d = resolve_access(&it, now(), &user, &AccessPolicyV1::default());
            assert_eq!(d, AccessDecision::deny(ReasonCode::FutureLocked), "{tier}");
        }
    }

    #[test]
    fn test_guest_window_boundary() {
        let user = UserContext::new(Tier::Guest);
        let policy = AccessPolicyV1::default();

        // Exactly 7 days back is the last day inside the window.
        let edge = item(Some(day(2025, 6, 7)));
        assert!(resolve_access(&edge, now(), &user, &policy).accessible);

        // 9 days back is out.
        let old = item(Some(day(2025, 6, 5)));
        assert_eq!(
            resolve_access(&old, now(), &user, &policy),
            AccessDecision::deny(ReasonCode::GuestWindowExceeded)
        );
    }

    #[test]
    fn test_guest_quota_exhaustion() {
        let policy = AccessPolicyV1::default();
        let it = item(Some(now()));

        let fresh = UserContext::new(Tier::Guest).with_quota_used(policy.guest_daily_limit - 1);
        assert_eq!(
            resolve_access(&it, now(), &fresh, &policy),
            AccessDecision::grant(ReasonCode::GuestToday)
        );

        let spent = UserContext::new(Tier::Guest).with_quota_used(policy.guest_daily_limit);
        assert_eq!(
            resolve_access(&it, now(), &spent, &policy),
            AccessDecision::deny(ReasonCode::GuestQuotaReached)
        );
    }

    #[test]
    fn test_guest_quota_skips_completed_items() {
        let policy = AccessPolicyV1::default();
        let it = item(Some(now()));
        let user = UserContext::new(Tier::Guest)
            .with_quota_used(policy.guest_daily_limit)
            .with_completed(["item_001"]);
        assert_eq!(
            resolve_access(&it, now(), &user, &policy),
            AccessDecision::grant(ReasonCode::GuestToday)
        );
    }

    #[test]
    fn test_paid_tiers_reach_archive() {
        let it = item(Some(day(2020, 1, 1)));
        for tier in [Tier::Premium, Tier::Pro] {
            let user = UserContext::new(tier);
            let d = resolve_access(&it, now(), &user, &AccessPolicyV1::default());
            assert_eq!(d, AccessDecision::grant(ReasonCode::PremiumAccess));
        }
    }

    #[test]
    fn test_free_tier_window_and_completion() {
        let policy = AccessPolicyV1::default();
        let user = UserContext::new(Tier::Free);

        assert_eq!(
            resolve_access(&item(Some(now())), now(), &user, &policy).reason,
            ReasonCode::FreeUserAllowed
        );
        assert_eq!(
            resolve_access(&item(Some(day(2025, 6, 8))), now(), &user, &policy).reason,
            ReasonCode::FreeUserAllowed
        );
        assert_eq!(
            resolve_access(&item(Some(day(2025, 5, 1))), now(), &user, &policy),
            AccessDecision::deny(ReasonCode::PremiumRequired)
        );

        // Completion reaches past the window.
        let completed = user.clone().with_completed(["item_001"]);
        assert_eq!(
            resolve_access(&item(Some(day(2025, 5, 1))), now(), &completed, &policy),
            AccessDecision::grant(ReasonCode::FreeUserAllowed)
        );
    }

    #[test]
    fn test_determinism_repeated_resolution() {
        let it = item(Some(day(2025, 6, 10))).featured(true);
        let user = UserContext::new(Tier::Free);
        let policy = AccessPolicyV1::default();

        let first = resolve_access(&it, now(), &user, &policy);
        for _ in 0..100 {
            assert_eq!(resolve_access(&it, now(), &user, &policy), first);
        }
    }
}
