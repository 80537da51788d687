//! Catalog item types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Unique identifier for a catalog item.
///
/// Wraps the opaque id string issued by the catalog service and
/// implements `Ord` for deterministic ordering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(String);

impl ItemId {
    /// Create a new ItemId from an id string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A unit of dated content evaluated for access.
///
/// Items are value objects: flag or content changes produce a new `Item`,
/// never an in-place mutation of one already merged into a working set.
/// The date is day-granular; time-of-day never participates in comparisons.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Unique item identifier.
    pub id: ItemId,
    /// Calendar date, `None` when the raw date failed normalization.
    pub date: Option<NaiveDate>,
    /// Category tags.
    pub categories: BTreeSet<String>,
    /// Breaking override flag: forces accessibility, sorts first.
    pub breaking: bool,
    /// Featured override flag: forces accessibility, sorts before regular items.
    pub featured: bool,
    /// Whether the item is actually consumable yet.
    pub has_content: bool,
}

impl Item {
    /// Create a new item with no flags and consumable content.
    pub fn new(id: impl Into<ItemId>, date: Option<NaiveDate>) -> Self {
        Self {
            id: id.into(),
            date,
            categories: BTreeSet::new(),
            breaking: false,
            featured: false,
            has_content: true,
        }
    }

    /// Set the breaking flag.
    pub fn breaking(mut self, breaking: bool) -> Self {
        self.breaking = breaking;
        self
    }

    /// Set the featured flag.
    pub fn featured(mut self, featured: bool) -> Self {
        self.featured = featured;
        self
    }

    /// Set whether the item has consumable content.
    pub fn with_content(mut self, has_content: bool) -> Self {
        self.has_content = has_content;
        self
    }

    /// Replace the category set.
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Whether either override flag is set.
    pub fn is_override(&self) -> bool {
        self.breaking || self.featured
    }
}

// Identity-based equality: two items are the same entry when their ids match.
impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Item {}

impl PartialOrd for Item {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Item {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_id_ordering() {
        let a = ItemId::new("item_001");
        let b = ItemId::new("item_002");
        assert!(a < b);
    }

    #[test]
    fn test_identity_equality_ignores_flags() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 14);
        let plain = Item::new("item_001", date);
        let flagged = Item::new("item_001", date).breaking(true);
        assert_eq!(plain, flagged);
    }

    #[test]
    fn test_is_override() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 14);
        assert!(!Item::new("a", date).is_override());
        assert!(Item::new("a", date).breaking(true).is_override());
        assert!(Item::new("a", date).featured(true).is_override());
    }

    #[test]
    fn test_serde_round_trip() {
        let item = Item::new("item_001", NaiveDate::from_ymd_opt(2025, 6, 14))
            .featured(true)
            .with_categories(["history", "science"]);
        let json = serde_json::to_string(&item).unwrap();
        let back: Item = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, item.id);
        assert_eq!(back.date, item.date);
        assert!(back.featured);
        assert_eq!(back.categories.len(), 2);
    }
}
