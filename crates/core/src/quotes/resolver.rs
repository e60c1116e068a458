//! Quote resolution: cache, cooldown, provider, store.
//!
//! Resolution never fails. Each ticker ends up with exactly one of:
//!
//! ```text
//! fresh cache hit ──────────────────────────────▶ Cache
//! cooldown inactive, provider returns data ─────▶ Provider   (cache + store updated)
//! otherwise: stale cache entry ─────────────────▶ StaleCache
//!            stored row ────────────────────────▶ Store
//!            nothing ───────────────────────────▶ Missing    (all fields absent)
//! ```
//!
//! A rate-limit signal from the provider chain starts the global cooldown;
//! while it lasts no resolution touches the network.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use folio_market_data::{
    BatchFetch, Clock, CooldownTracker, FailureKind, MarketDataError, ProviderRegistry, Quote,
    SystemClock,
};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::cache::QuoteCache;
use super::store::QuoteStore;

/// Provider-side seam of the resolver.
#[async_trait]
pub trait QuoteFetcher: Send + Sync {
    async fn fetch_one(&self, ticker: &str) -> Result<Quote, MarketDataError>;

    async fn fetch_batch(&self, tickers: &[String]) -> BatchFetch;
}

#[async_trait]
impl QuoteFetcher for ProviderRegistry {
    async fn fetch_one(&self, ticker: &str) -> Result<Quote, MarketDataError> {
        ProviderRegistry::fetch_one(self, ticker).await
    }

    async fn fetch_batch(&self, tickers: &[String]) -> BatchFetch {
        ProviderRegistry::fetch_batch(self, tickers).await
    }
}

/// Where a resolved quote came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuoteOrigin {
    /// Fresh cache entry.
    Cache,
    /// Fetched from a provider during this resolution.
    Provider,
    /// Cache entry older than the TTL.
    StaleCache,
    /// Last row written to the persistent store.
    Store,
    /// No data anywhere.
    Missing,
}

impl QuoteOrigin {
    /// True for data that is within the cache TTL.
    pub fn is_live(self) -> bool {
        matches!(self, Self::Cache | Self::Provider)
    }
}

/// A quote together with how it was obtained.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedQuote {
    pub quote: Quote,
    pub origin: QuoteOrigin,
}

impl ResolvedQuote {
    fn new(quote: Quote, origin: QuoteOrigin) -> Self {
        Self { quote, origin }
    }
}

/// Orchestrates the cache, cooldown, provider client and store.
pub struct QuoteResolver {
    fetcher: Arc<dyn QuoteFetcher>,
    store: Arc<dyn QuoteStore>,
    cache: Arc<QuoteCache>,
    cooldown: Arc<CooldownTracker>,
    clock: Arc<dyn Clock>,
}

impl QuoteResolver {
    pub fn new(
        fetcher: Arc<dyn QuoteFetcher>,
        store: Arc<dyn QuoteStore>,
        cache: Arc<QuoteCache>,
        cooldown: Arc<CooldownTracker>,
    ) -> Self {
        Self {
            fetcher,
            store,
            cache,
            cooldown,
            clock: Arc::new(SystemClock),
        }
    }

    /// Use `clock` to timestamp quotes that no source could supply.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Resolve one ticker.
    pub async fn resolve(&self, ticker: &str) -> ResolvedQuote {
        if let Some(quote) = self.cache.get(ticker) {
            debug!("Cache hit for {}", ticker);
            return ResolvedQuote::new(quote, QuoteOrigin::Cache);
        }

        if self.cooldown.is_cooling_down() {
            debug!(
                "Cooldown active for {:?}, not fetching {}",
                self.cooldown.remaining(),
                ticker
            );
            return self.fallback(ticker);
        }

        match self.fetcher.fetch_one(ticker).await {
            Ok(mut quote) if quote.has_data() => {
                quote.ticker = ticker.to_string();
                self.cache.set(ticker, quote.clone());
                if let Err(e) = self.store.save(&quote).await {
                    warn!("Failed to persist quote for {}: {}", ticker, e);
                }
                ResolvedQuote::new(quote, QuoteOrigin::Provider)
            }
            Ok(_) => {
                debug!("Provider returned no data for {}", ticker);
                self.fallback(ticker)
            }
            Err(e) => {
                self.note_failure(&e);
                self.fallback(ticker)
            }
        }
    }

    /// Resolve many tickers with at most one provider-client call.
    ///
    /// Duplicates are resolved once; the map holds one entry per distinct
    /// ticker.
    pub async fn resolve_batch(&self, tickers: &[String]) -> HashMap<String, ResolvedQuote> {
        let mut seen = HashSet::new();
        let unique: Vec<&String> = tickers.iter().filter(|t| seen.insert(t.as_str())).collect();

        let mut results = HashMap::with_capacity(unique.len());
        let mut misses = Vec::new();
        for ticker in unique {
            match self.cache.get(ticker) {
                Some(quote) => {
                    results.insert(ticker.clone(), ResolvedQuote::new(quote, QuoteOrigin::Cache));
                }
                None => misses.push(ticker.clone()),
            }
        }

        if misses.is_empty() {
            return results;
        }
        debug!(
            "{} cache hit(s), {} miss(es)",
            results.len(),
            misses.len()
        );

        if self.cooldown.is_cooling_down() {
            debug!(
                "Cooldown active for {:?}, not fetching {} ticker(s)",
                self.cooldown.remaining(),
                misses.len()
            );
        } else {
            let mut fetch = self.fetcher.fetch_batch(&misses).await;
            if let Some(e) = &fetch.failure {
                self.note_failure(e);
            }

            let mut fresh = Vec::new();
            for ticker in &misses {
                if let Some(mut quote) = fetch.quotes.remove(ticker).filter(Quote::has_data) {
                    quote.ticker = ticker.clone();
                    self.cache.set(ticker, quote.clone());
                    fresh.push(quote.clone());
                    results.insert(ticker.clone(), ResolvedQuote::new(quote, QuoteOrigin::Provider));
                }
            }

            if !fresh.is_empty() {
                if let Err(e) = self.store.save_many(&fresh).await {
                    warn!("Failed to persist {} quote(s): {}", fresh.len(), e);
                }
            }
        }

        let mut need_store = Vec::new();
        for ticker in misses {
            if results.contains_key(&ticker) {
                continue;
            }
            match self.cache.get_stale(&ticker) {
                Some(quote) => {
                    results.insert(ticker, ResolvedQuote::new(quote, QuoteOrigin::StaleCache));
                }
                None => need_store.push(ticker),
            }
        }

        if need_store.is_empty() {
            return results;
        }

        let mut stored = match self.store.load_many(&need_store) {
            Ok(stored) => stored,
            Err(e) => {
                warn!("Failed to load {} stored quote(s): {}", need_store.len(), e);
                HashMap::new()
            }
        };

        for ticker in need_store {
            let resolved = match stored.remove(&ticker) {
                Some(quote) => ResolvedQuote::new(quote, QuoteOrigin::Store),
                None => self.missing(&ticker),
            };
            results.insert(ticker, resolved);
        }

        results
    }

    fn note_failure(&self, error: &MarketDataError) {
        match error.kind() {
            FailureKind::RateLimited => self.cooldown.trigger(),
            FailureKind::NotFound => debug!("No provider knows the ticker: {}", error),
            FailureKind::Unavailable => {
                debug!("Falling back after provider failure: {}", error);
            }
        }
    }

    /// Stale cache, then store, then an empty quote.
    fn fallback(&self, ticker: &str) -> ResolvedQuote {
        if let Some(quote) = self.cache.get_stale(ticker) {
            return ResolvedQuote::new(quote, QuoteOrigin::StaleCache);
        }

        match self.store.load(ticker) {
            Ok(Some(quote)) => ResolvedQuote::new(quote, QuoteOrigin::Store),
            Ok(None) => self.missing(ticker),
            Err(e) => {
                warn!("Failed to load stored quote for {}: {}", ticker, e);
                self.missing(ticker)
            }
        }
    }

    fn missing(&self, ticker: &str) -> ResolvedQuote {
        ResolvedQuote::new(Quote::empty(ticker, self.clock.now()), QuoteOrigin::Missing)
    }
}
