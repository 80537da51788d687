//! Deterministic ordering of catalog items.
//!
//! Total order, descending priority: breaking first, then (among
//! non-breaking items) featured, then date descending. Remaining ties keep
//! their original relative order: the sort is stable, not merely a valid
//! total order, so repeated sorts of the same input are byte-identical.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::types::{Item, ItemId};

/// Compare two items under the navigation order.
///
/// Undated items sort after all dated items; they resolve to
/// `invalid_date` and are unreachable, but the order must stay total.
pub fn compare_items(a: &Item, b: &Item) -> Ordering {
    b.breaking
        .cmp(&a.breaking)
        .then_with(|| {
            // Featured only separates non-breaking items; among breaking
            // items recency decides.
            if !a.breaking && !b.breaking {
                b.featured.cmp(&a.featured)
            } else {
                Ordering::Equal
            }
        })
        .then_with(|| compare_dates_desc(a.date, b.date))
}

fn compare_dates_desc(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sort items in place under the navigation order (stable).
pub fn sort_items(items: &mut [Item]) {
    items.sort_by(compare_items);
}

/// Produce the ordered id sequence for a set of items without moving them.
pub fn order_items(items: &[Item]) -> Vec<ItemId> {
    let mut refs: Vec<&Item> = items.iter().collect();
    refs.sort_by(|a, b| compare_items(a, b));
    refs.into_iter().map(|item| item.id.clone()).collect()
}
