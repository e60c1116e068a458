//! In-memory TTL cache of latest quotes.
//!
//! Entries are never removed on expiry. A stale entry is invisible to
//! [`QuoteCache::get`] but still served by [`QuoteCache::get_stale`], which
//! the resolver uses when the network is off limits.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use folio_market_data::{Clock, Quote, SystemClock};
use log::{debug, warn};

use crate::constants::{DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_CACHE_TTL};

#[derive(Debug, Clone)]
struct CacheEntry {
    quote: Quote,
    inserted_at: DateTime<Utc>,
}

/// Bounded TTL cache keyed by ticker.
pub struct QuoteCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: chrono::Duration,
    max_entries: usize,
    clock: Arc<dyn Clock>,
}

impl QuoteCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self::with_clock(ttl, max_entries, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, max_entries: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl: chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::weeks(52)),
            max_entries: max_entries.max(1),
            clock,
        }
    }

    fn lock_entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| {
            warn!("Quote cache mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// The cached quote for `ticker` if it is no older than the TTL.
    pub fn get(&self, ticker: &str) -> Option<Quote> {
        let now = self.clock.now();
        let entries = self.lock_entries();
        entries
            .get(ticker)
            .filter(|entry| now - entry.inserted_at <= self.ttl)
            .map(|entry| entry.quote.clone())
    }

    /// The cached quote for `ticker` regardless of age.
    pub fn get_stale(&self, ticker: &str) -> Option<Quote> {
        self.lock_entries()
            .get(ticker)
            .map(|entry| entry.quote.clone())
    }

    /// Store `quote` under `ticker`, replacing any entry and resetting its age.
    ///
    /// Inserting a new ticker into a full cache evicts the oldest entry.
    pub fn set(&self, ticker: &str, quote: Quote) {
        let now = self.clock.now();
        let mut entries = self.lock_entries();

        if !entries.contains_key(ticker) && entries.len() >= self.max_entries {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.inserted_at)
                .map(|(key, _)| key.clone());
            if let Some(oldest) = oldest {
                debug!("Quote cache full, evicting '{}'", oldest);
                entries.remove(&oldest);
            }
        }

        entries.insert(
            ticker.to_string(),
            CacheEntry {
                quote,
                inserted_at: now,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_entries().is_empty()
    }

    pub fn clear(&self) {
        self.lock_entries().clear();
    }
}

impl Default for QuoteCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL, DEFAULT_CACHE_MAX_ENTRIES)
    }
}
