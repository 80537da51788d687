//! Windowed catalog loading with deduplication.
//!
//! The loader fetches date windows or pages from a [`CatalogSource`] and
//! merges them into a single duplicate-free working set. Merging is
//! idempotent (re-applying a batch is a no-op) and commutative (batch
//! completion order does not change the final id set), because concurrent
//! fetches settle in any order.
//!
//! ## Failure model
//!
//! Every fetch is bounded by a timeout and retried with doubling backoff.
//! A fetch that still fails degrades to an empty contribution for that
//! slice and is logged; it never aborts sibling fetches or surfaces as an
//! error to the caller of the aggregate load.
//!
//! ## Cancellation
//!
//! Each load captures the loader generation at start and re-checks it
//! before committing results. Bumping the generation via [`LoadHandle`]
//! (filters changed, owner torn down) makes in-flight batches discard
//! themselves instead of merging stale data.

pub mod catalog;

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{Duration as DateDuration, NaiveDate};

use crate::nav::NavigationState;
use crate::types::{Item, ItemId, RangeKey, WindowRange};

pub use catalog::{CatalogEndpoint, CatalogSource, InMemoryCatalog, InMemoryCatalogError};

/// Configuration for the window loader.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// A fetch returning fewer items than this triggers the one-time
    /// full-catalog fallback.
    pub min_expected: usize,
    /// Items per page in paginated mode.
    pub page_size: usize,
    /// Prefetch when the navigation index comes within this many
    /// positions of either list edge (range mode).
    pub prefetch_margin: usize,
    /// Edge margin in paginated mode.
    pub page_prefetch_margin: usize,
    /// Days added per prefetch extension in range mode.
    pub prefetch_step_days: i64,
    /// Upper bound on a single catalog call.
    pub fetch_timeout: Duration,
    /// Retries after the first failed attempt.
    pub max_retries: u32,
    /// Initial backoff between attempts, doubled each retry.
    pub retry_backoff: Duration,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            min_expected: 3,
            page_size: 20,
            prefetch_margin: 10,
            page_prefetch_margin: 3,
            prefetch_step_days: 7,
            fetch_timeout: Duration::from_secs(10),
            max_retries: 2,
            retry_backoff: Duration::from_millis(250),
        }
    }
}

/// The duplicate-free working set of loaded items.
///
/// Grows monotonically until [`LoadedState::reset`]. Set semantics are
/// over item id, not over (id, fetch batch): the first-seen value wins and
/// later duplicates are silently filtered, counted only for diagnostics.
#[derive(Debug, Clone, Default)]
pub struct LoadedState {
    items: BTreeMap<ItemId, Item>,
    loaded_ranges: BTreeSet<RangeKey>,
    duplicates_discarded: u64,
}

impl LoadedState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a fetched batch by id. Returns the number of new entries.
    pub fn merge_batch(&mut self, batch: Vec<Item>) -> usize {
        let mut added = 0;
        for item in batch {
            match self.items.entry(item.id.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(item);
                    added += 1;
                }
                Entry::Occupied(_) => {
                    self.duplicates_discarded += 1;
                }
            }
        }
        added
    }

    /// Record a window or page as fetched.
    pub fn mark_loaded(&mut self, key: RangeKey) {
        self.loaded_ranges.insert(key);
    }

    /// Whether a window or page was already fetched.
    pub fn is_loaded(&self, key: &RangeKey) -> bool {
        self.loaded_ranges.contains(key)
    }

    /// Look up an item by id.
    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.get(id)
    }

    /// Whether an item is present.
    pub fn contains(&self, id: &ItemId) -> bool {
        self.items.contains_key(id)
    }

    /// Iterate items in id order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// Snapshot of the current id set, in id order.
    pub fn ids(&self) -> Vec<ItemId> {
        self.items.keys().cloned().collect()
    }

    /// Number of distinct items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no items are loaded.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Duplicates filtered since the last reset. Diagnostic only.
    pub fn duplicates_discarded(&self) -> u64 {
        self.duplicates_discarded
    }

    /// Drop all items and bookkeeping.
    pub fn reset(&mut self) {
        self.items.clear();
        self.loaded_ranges.clear();
        self.duplicates_discarded = 0;
    }
}

/// Aggregate result of an all-settle initial load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Every slice contributed.
    Complete,
    /// Some slices failed; the rest merged normally.
    Partial {
        /// Names of the slices that contributed nothing.
        failed_slices: Vec<String>,
    },
    /// Every slice failed; the caller should render an explicit empty state.
    Empty,
    /// The loader generation changed mid-flight; nothing was merged.
    Superseded,
}

/// Cancellation handle for in-flight loads.
///
/// Cloneable and cheap; bumping the generation makes any load started
/// earlier discard its result instead of committing it.
#[derive(Debug, Clone)]
pub struct LoadHandle {
    generation: Arc<AtomicU64>,
}

impl LoadHandle {
    /// Mark all in-flight loads as superseded.
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

/// Windowed, deduplicating catalog loader.
///
/// Owns the working set; all merges are serialized through its `&mut`
/// methods rather than guarded by locks.
pub struct WindowLoader<S: CatalogSource> {
    source: Arc<S>,
    config: LoaderConfig,
    state: LoadedState,
    generation: Arc<AtomicU64>,
    full_fallback_done: bool,
    loaded_span: Option<WindowRange>,
    next_page: Option<u32>,
}

impl<S: CatalogSource> WindowLoader<S> {
    /// Create a loader over the given catalog source.
    pub fn new(source: Arc<S>, config: LoaderConfig) -> Self {
        Self {
            source,
            config,
            state: LoadedState::new(),
            generation: Arc::new(AtomicU64::new(0)),
            full_fallback_done: false,
            loaded_span: None,
            next_page: None,
        }
    }

    /// The current working set.
    pub fn state(&self) -> &LoadedState {
        &self.state
    }

    /// The loader configuration.
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Cancellation handle shared with in-flight loads.
    pub fn handle(&self) -> LoadHandle {
        LoadHandle {
            generation: Arc::clone(&self.generation),
        }
    }

    /// Union of all date windows loaded so far.
    pub fn loaded_span(&self) -> Option<WindowRange> {
        self.loaded_span
    }

    /// Drop the working set and start a new generation.
    pub fn reset(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.state.reset();
        self.full_fallback_done = false;
        self.loaded_span = None;
        self.next_page = None;
    }

    /// Load one date window. Returns the number of newly merged items.
    ///
    /// No-op when the window was already fetched. A sparse result (fewer
    /// than `min_expected` items) triggers the one-time full-catalog
    /// fallback so the working set cannot stay perpetually under-filled.
    pub async fn load_range(&mut self, range: WindowRange) -> usize {
        let key = range.key();
        if self.state.is_loaded(&key) {
            return 0;
        }
        let generation = self.current_generation();
        let batch = match self
            .fetch_with_retry("window", || self.source.items_in_range(&range))
            .await
        {
            Some(batch) => batch,
            None => return 0,
        };
        if generation != self.current_generation() {
            tracing::debug!(%range, "discarding stale window batch");
            return 0;
        }
        self.extend_span(range);
        self.absorb(generation, key, batch).await
    }

    /// Load one page in paginated mode. Returns newly merged items.
    pub async fn load_page(&mut self, page: u32) -> usize {
        let key = RangeKey::Page(page);
        if self.state.is_loaded(&key) {
            return 0;
        }
        let generation = self.current_generation();
        let page_size = self.config.page_size;
        let batch = match self
            .fetch_with_retry("page", || self.source.items_for_page(page, page_size))
            .await
        {
            Some(batch) => batch,
            None => return 0,
        };
        if generation != self.current_generation() {
            tracing::debug!(page, "discarding stale page batch");
            return 0;
        }
        self.next_page = Some(self.next_page.map_or(page + 1, |n| n.max(page + 1)));
        self.absorb(generation, key, batch).await
    }

    /// All-settle initial load: featured items, today's items, and a broad
    /// date window fetched concurrently.
    ///
    /// Each slice fails in isolation; the aggregate merges whatever
    /// succeeded and reports how much of the fan survived.
    pub async fn load_initial(&mut self, now: NaiveDate, range: WindowRange) -> LoadOutcome {
        let generation = self.current_generation();
        let key = range.key();

        let (featured, today, window) = futures::future::join3(
            self.fetch_with_retry("featured", || self.source.featured_items()),
            self.fetch_with_retry("today", || self.source.items_for_date(now)),
            self.fetch_with_retry("window", || self.source.items_in_range(&range)),
        )
        .await;

        if generation != self.current_generation() {
            tracing::debug!("discarding superseded initial load");
            return LoadOutcome::Superseded;
        }

        let mut failed_slices = Vec::new();
        let mut any_success = false;
        for (name, batch) in [("featured", featured), ("today", today), ("window", window)] {
            match batch {
                Some(items) => {
                    any_success = true;
                    if name == "window" {
                        self.state.mark_loaded(key.clone());
                        self.extend_span(range);
                    }
                    self.state.merge_batch(items);
                }
                None => failed_slices.push(name.to_string()),
            }
        }

        if !any_success {
            LoadOutcome::Empty
        } else if failed_slices.is_empty() {
            LoadOutcome::Complete
        } else {
            LoadOutcome::Partial { failed_slices }
        }
    }

    /// Extend the loaded window when navigation approaches either edge of
    /// the ordered list, so movement never dead-ends on an unloaded span.
    ///
    /// Index 0 is the newest end of the list; the tail is the oldest. In
    /// paginated mode the next page is appended instead of a date window.
    pub async fn maybe_prefetch(&mut self, nav: &NavigationState) -> usize {
        let Some(index) = nav.current_index() else {
            return 0;
        };
        let len = nav.len();
        if len == 0 {
            return 0;
        }

        if let Some(next_page) = self.next_page {
            if index + self.config.page_prefetch_margin >= len
                || index < self.config.page_prefetch_margin
            {
                return self.load_page(next_page).await;
            }
            return 0;
        }

        let Some(span) = self.loaded_span else {
            return 0;
        };
        let step = DateDuration::days(self.config.prefetch_step_days);
        let mut added = 0;
        if index + self.config.prefetch_margin >= len {
            let older = WindowRange::new(span.start - step, span.start - DateDuration::days(1));
            added += self.load_range(older).await;
        }
        if index < self.config.prefetch_margin {
            let newer = WindowRange::new(span.end + DateDuration::days(1), span.end + step);
            added += self.load_range(newer).await;
        }
        added
    }

    fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn extend_span(&mut self, range: WindowRange) {
        self.loaded_span = Some(match self.loaded_span {
            None => range,
            Some(span) => WindowRange::new(span.start.min(range.start), span.end.max(range.end)),
        });
    }

    async fn absorb(&mut self, generation: u64, key: RangeKey, batch: Vec<Item>) -> usize {
        let sparse = batch.len() < self.config.min_expected;
        self.state.mark_loaded(key);
        let mut added = self.state.merge_batch(batch);

        if sparse && !self.full_fallback_done {
            self.full_fallback_done = true;
            tracing::debug!("sparse fetch, falling back to full catalog");
            let fetched = self.fetch_with_retry("all", || self.source.all_items()).await;
            if let Some(all) = fetched {
                if generation == self.current_generation() {
                    added += self.state.merge_batch(all);
                } else {
                    tracing::debug!("discarding stale full-catalog batch");
                }
            }
        }
        added
    }

    async fn fetch_with_retry<T, F, Fut>(&self, slice: &str, mut op: F) -> Option<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, S::Error>>,
    {
        let mut backoff = self.config.retry_backoff;
        let mut attempt = 0u32;
        loop {
            match tokio::time::timeout(self.config.fetch_timeout, op()).await {
                Ok(Ok(value)) => return Some(value),
                Ok(Err(error)) => {
                    tracing::warn!(slice, attempt, %error, "catalog fetch failed");
                }
                Err(_) => {
                    tracing::warn!(
                        slice,
                        attempt,
                        timeout_ms = self.config.fetch_timeout.as_millis() as u64,
                        "catalog fetch timed out"
                    );
                }
            }
            if attempt >= self.config.max_retries {
                return None;
            }
            tokio::time::sleep(backoff).await;
            backoff = backoff.saturating_mul(2);
            attempt += 1;
        }
    }
}
