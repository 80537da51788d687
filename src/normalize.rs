//! Date normalization with bounded memoization.
//!
//! Catalog payloads carry dates in whatever shape the upstream feed
//! produced: ISO days, RFC 3339 timestamps, US-style slashes, spelled-out
//! months, or garbage. Everything funnels through [`DateNormalizer`],
//! which resolves each raw string to a calendar day or `None` (never an
//! error) and memoizes the answer per raw string.
//!
//! The cache is owned by the normalizer instance, bounded by an LRU, and
//! resettable, so nothing leaks across test runs or engine lifetimes.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use lru::LruCache;
use parking_lot::Mutex;
use regex_lite::Regex;
use std::num::NonZeroUsize;

/// ISO day format used for both parsing and rendering.
const ISO_DAY_FORMAT: &str = "%Y-%m-%d";

/// Free-form formats tried in order after the ISO fast path.
const FALLBACK_FORMATS: &[&str] = &["%m/%d/%Y", "%B %d, %Y", "%b %d, %Y", "%d %B %Y", "%d %b %Y"];

/// Configuration for the normalization cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of raw strings memoized.
    pub max_entries: usize,
    /// Whether to memoize at all.
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 4_096,
            enabled: true,
        }
    }
}

/// Cache hit/miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that required a parse.
    pub misses: u64,
}

struct CacheInner {
    entries: Option<LruCache<String, Option<NaiveDate>>>,
    stats: CacheStats,
}

/// Memoizing parser from heterogeneous date representations to calendar days.
pub struct DateNormalizer {
    cache: Mutex<CacheInner>,
    embedded_day: Regex,
}

impl DateNormalizer {
    /// Create a normalizer with the given cache configuration.
    pub fn new(config: CacheConfig) -> Self {
        let entries = if config.enabled && config.max_entries > 0 {
            NonZeroUsize::new(config.max_entries).map(LruCache::new)
        } else {
            None
        };
        Self {
            cache: Mutex::new(CacheInner {
                entries,
                stats: CacheStats::default(),
            }),
            embedded_day: Regex::new(r"\d{4}-\d{2}-\d{2}").expect("embedded day pattern"),
        }
    }

    /// Normalize a raw date string to a calendar day.
    ///
    /// Returns `None` for empty, `"null"`, `"undefined"`, or unparseable
    /// input. Never panics. Negative results are memoized too, so a feed
    /// full of the same malformed value parses once.
    pub fn normalize(&self, raw: &str) -> Option<NaiveDate> {
        let trimmed = raw.trim();
        if trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("null")
            || trimmed.eq_ignore_ascii_case("undefined")
        {
            return None;
        }

        {
            let mut guard = self.cache.lock();
            let inner = &mut *guard;
            if let Some(entries) = inner.entries.as_mut() {
                if let Some(cached) = entries.get(trimmed) {
                    inner.stats.hits += 1;
                    return *cached;
                }
            }
            inner.stats.misses += 1;
        }

        let parsed = self.parse_day(trimmed);

        let mut guard = self.cache.lock();
        if let Some(entries) = guard.entries.as_mut() {
            entries.put(trimmed.to_string(), parsed);
        }
        parsed
    }

    /// Current hit/miss counters.
    pub fn stats(&self) -> CacheStats {
        self.cache.lock().stats
    }

    /// Drop all memoized entries and zero the counters.
    pub fn reset(&self) {
        let mut guard = self.cache.lock();
        if let Some(entries) = guard.entries.as_mut() {
            entries.clear();
        }
        guard.stats = CacheStats::default();
        tracing::debug!("date normalizer cache reset");
    }

    fn parse_day(&self, s: &str) -> Option<NaiveDate> {
        if let Ok(day) = NaiveDate::parse_from_str(s, ISO_DAY_FORMAT) {
            return Some(day);
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.date_naive());
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
            return Some(dt.date());
        }
        for format in FALLBACK_FORMATS {
            if let Ok(day) = NaiveDate::parse_from_str(s, format) {
                return Some(day);
            }
        }
        // Last resort: an ISO day embedded in surrounding text.
        if let Some(m) = self.embedded_day.find(s) {
            if let Ok(day) = NaiveDate::parse_from_str(m.as_str(), ISO_DAY_FORMAT) {
                return Some(day);
            }
        }
        None
    }
}

impl Default for DateNormalizer {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

/// Strip time-of-day from an already-typed timestamp.
pub fn normalize_datetime(dt: DateTime<Utc>) -> NaiveDate {
    dt.date_naive()
}

/// Render a calendar day in the ISO format `normalize` accepts.
///
/// `normalize(&format_day(d)) == Some(d)` for every valid day `d`.
pub fn format_day(day: NaiveDate) -> String {
    day.format(ISO_DAY_FORMAT).to_string()
}
