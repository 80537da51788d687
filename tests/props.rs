//! Property tests for normalization round-trips, ordering stability, and
//! merge semantics.

use catalog_gate::{format_day, order_items, DateNormalizer, Item, LoadedState};
use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()
}

prop_compose! {
    fn any_day()(offset in 0i64..40_000) -> NaiveDate {
        epoch() + Duration::days(offset)
    }
}

prop_compose! {
    fn any_item()(
        n in 0u32..10_000,
        offset in 0i64..3_650,
        breaking in any::<bool>(),
        featured in any::<bool>(),
        dated in any::<bool>(),
    ) -> Item {
        let date = dated.then(|| epoch() + Duration::days(offset));
        Item::new(format!("item_{n}"), date)
            .breaking(breaking)
            .featured(featured)
    }
}

proptest! {
    #[test]
    fn normalize_round_trips_every_valid_day(d in any_day()) {
        let normalizer = DateNormalizer::default();
        prop_assert_eq!(normalizer.normalize(&format_day(d)), Some(d));
    }

    #[test]
    fn normalize_never_panics_on_garbage(s in "\\PC{0,40}") {
        let normalizer = DateNormalizer::default();
        let _ = normalizer.normalize(&s);
    }

    #[test]
    fn sorting_twice_is_identical(items in prop::collection::vec(any_item(), 0..50)) {
        prop_assert_eq!(order_items(&items), order_items(&items));
    }

    #[test]
    fn sort_order_is_total_and_consistent(items in prop::collection::vec(any_item(), 0..50)) {
        use catalog_gate::compare_items;
        use std::cmp::Ordering;

        // Antisymmetry over the generated sample.
        for a in &items {
            for b in &items {
                let ab = compare_items(a, b);
                let ba = compare_items(b, a);
                prop_assert_eq!(ab, ba.reverse());
            }
        }
        prop_assert!(items
            .iter()
            .all(|a| compare_items(a, a) == Ordering::Equal));
    }

    #[test]
    fn merge_order_never_changes_the_id_set(
        items in prop::collection::vec(any_item(), 0..40),
        split in 0usize..40,
    ) {
        let split = split.min(items.len());
        let (left, right) = items.split_at(split);

        let mut forward = LoadedState::new();
        forward.merge_batch(left.to_vec());
        forward.merge_batch(right.to_vec());

        let mut backward = LoadedState::new();
        backward.merge_batch(right.to_vec());
        backward.merge_batch(left.to_vec());

        prop_assert_eq!(forward.ids(), backward.ids());
    }

    #[test]
    fn remerging_everything_is_a_noop(items in prop::collection::vec(any_item(), 0..40)) {
        let mut state = LoadedState::new();
        state.merge_batch(items.clone());
        let once = state.ids();
        state.merge_batch(items);
        prop_assert_eq!(state.ids(), once);
    }
}
