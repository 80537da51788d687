//! Catalog service backends.

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::Mutex;
use std::collections::BTreeSet;

use crate::types::{Item, ItemId, WindowRange};

/// Trait for catalog service backends.
///
/// All methods are async because real backends sit behind the network.
/// Implementations return items in a deterministic order for identical
/// state, so merges stay replayable.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Error type for catalog operations.
    type Error: std::error::Error + Send + Sync;

    /// Fetch items dated within the window (inclusive).
    async fn items_in_range(&self, range: &WindowRange) -> Result<Vec<Item>, Self::Error>;

    /// Fetch the entire catalog.
    async fn all_items(&self) -> Result<Vec<Item>, Self::Error>;

    /// Fetch items carrying an override flag.
    async fn featured_items(&self) -> Result<Vec<Item>, Self::Error>;

    /// Fetch items dated exactly on the given day.
    async fn items_for_date(&self, day: NaiveDate) -> Result<Vec<Item>, Self::Error>;

    /// Fetch one page of the catalog in the backend's paging order.
    async fn items_for_page(&self, page: u32, page_size: usize)
        -> Result<Vec<Item>, Self::Error>;

    /// Whether the item has consumable content yet.
    async fn item_has_content(&self, id: &ItemId) -> Result<bool, Self::Error>;
}

/// Error type for the in-memory catalog.
#[derive(Debug, Clone, thiserror::Error)]
pub enum InMemoryCatalogError {
    /// An endpoint was marked unavailable via failure injection.
    #[error("catalog endpoint unavailable: {0}")]
    Unavailable(&'static str),
}

/// Catalog endpoints, addressable for failure injection in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CatalogEndpoint {
    /// `items_in_range`.
    Range,
    /// `all_items`.
    All,
    /// `featured_items`.
    Featured,
    /// `items_for_date`.
    ForDate,
    /// `items_for_page`.
    Page,
    /// `item_has_content`.
    HasContent,
}

impl CatalogEndpoint {
    fn name(&self) -> &'static str {
        match self {
            Self::Range => "items_in_range",
            Self::All => "all_items",
            Self::Featured => "featured_items",
            Self::ForDate => "items_for_date",
            Self::Page => "items_for_page",
            Self::HasContent => "item_has_content",
        }
    }
}

/// In-memory catalog for testing.
///
/// Items keep insertion order, which defines the backend's paging order.
/// Individual endpoints can be marked failing to exercise the loader's
/// per-slice degradation.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    items: Vec<Item>,
    failing: Mutex<BTreeSet<CatalogEndpoint>>,
}

impl InMemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog from a list of items.
    pub fn with_items(items: Vec<Item>) -> Self {
        Self {
            items,
            failing: Mutex::new(BTreeSet::new()),
        }
    }

    /// Append an item.
    pub fn add_item(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Mark an endpoint as failing (or restore it).
    pub fn set_failing(&self, endpoint: CatalogEndpoint, failing: bool) {
        let mut guard = self.failing.lock();
        if failing {
            guard.insert(endpoint);
        } else {
            guard.remove(&endpoint);
        }
    }

    fn check(&self, endpoint: CatalogEndpoint) -> Result<(), InMemoryCatalogError> {
        if self.failing.lock().contains(&endpoint) {
            Err(InMemoryCatalogError::Unavailable(endpoint.name()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CatalogSource for InMemoryCatalog {
    type Error = InMemoryCatalogError;

    async fn items_in_range(&self, range: &WindowRange) -> Result<Vec<Item>, Self::Error> {
        self.check(CatalogEndpoint::Range)?;
        Ok(self
            .items
            .iter()
            .filter(|item| item.date.is_some_and(|d| range.contains(d)))
            .cloned()
            .collect())
    }

    async fn all_items(&self) -> Result<Vec<Item>, Self::Error> {
        self.check(CatalogEndpoint::All)?;
        Ok(self.items.clone())
    }

    async fn featured_items(&self) -> Result<Vec<Item>, Self::Error> {
        self.check(CatalogEndpoint::Featured)?;
        Ok(self
            .items
            .iter()
            .filter(|item| item.is_override())
            .cloned()
            .collect())
    }

    async fn items_for_date(&self, day: NaiveDate) -> Result<Vec<Item>, Self::Error> {
        self.check(CatalogEndpoint::ForDate)?;
        Ok(self
            .items
            .iter()
            .filter(|item| item.date == Some(day))
            .cloned()
            .collect())
    }

    async fn items_for_page(
        &self,
        page: u32,
        page_size: usize,
    ) -> Result<Vec<Item>, Self::Error> {
        self.check(CatalogEndpoint::Page)?;
        let start = page as usize * page_size;
        Ok(self
            .items
            .iter()
            .skip(start)
            .take(page_size)
            .cloned()
            .collect())
    }

    async fn item_has_content(&self, id: &ItemId) -> Result<bool, Self::Error> {
        self.check(CatalogEndpoint::HasContent)?;
        Ok(self
            .items
            .iter()
            .find(|item| &item.id == id)
            .map(|item| item.has_content)
            .unwrap_or(false))
    }
}
