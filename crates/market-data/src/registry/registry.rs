//! Provider registry: the priority-ordered fallback chain.
//!
//! The registry owns every configured provider and decides, per request,
//! which of them to call and with which tickers:
//! - Providers are tried in priority order (lower first)
//! - A ticker is settled by the first provider that returns any field for it
//! - Tickers a provider left unanswered move on to the next provider
//! - A rate-limit signal stops the chain immediately
//! - Client-side token buckets skip a provider instead of waiting for it

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use log::{debug, info, warn};

use super::RateLimiter;
use crate::errors::{MarketDataError, RetryClass};
use crate::models::{ProviderId, Quote};
use crate::provider::MarketDataProvider;

/// Outcome of one pass through the provider chain.
///
/// `quotes` holds every ticker that some provider answered with data, keyed
/// by the requested spelling. `failure` is set when at least one requested
/// ticker is missing from `quotes`, and explains why.
#[derive(Debug, Default)]
pub struct BatchFetch {
    pub quotes: HashMap<String, Quote>,
    pub failure: Option<MarketDataError>,
}

/// Provider registry for orchestrating quote fetching.
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn MarketDataProvider>>,
    rate_limiter: RateLimiter,
}

impl ProviderRegistry {
    /// Create a registry; providers are sorted by priority.
    pub fn new(providers: Vec<Arc<dyn MarketDataProvider>>) -> Self {
        Self::with_rate_limiter(providers, RateLimiter::new())
    }

    /// Create a registry with a caller-supplied rate limiter.
    pub fn with_rate_limiter(
        mut providers: Vec<Arc<dyn MarketDataProvider>>,
        rate_limiter: RateLimiter,
    ) -> Self {
        providers.sort_by_key(|p| p.priority());
        for provider in &providers {
            let provider_id: ProviderId = Cow::Borrowed(provider.id());
            rate_limiter.register(&provider_id, &provider.rate_limit());
        }
        Self {
            providers,
            rate_limiter,
        }
    }

    /// Provider ids in the order they are tried.
    pub fn provider_ids(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.id()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Fetch the latest quote for one ticker.
    pub async fn fetch_one(&self, ticker: &str) -> Result<Quote, MarketDataError> {
        let requested = [ticker.to_string()];
        let mut fetch = self.fetch_batch(&requested).await;
        match fetch.quotes.remove(ticker) {
            Some(quote) => Ok(quote),
            None => Err(fetch
                .failure
                .unwrap_or_else(|| MarketDataError::SymbolNotFound(ticker.to_string()))),
        }
    }

    /// Fetch the latest quotes for `tickers` through the provider chain.
    ///
    /// Never fails as a whole: whatever was obtained before a failure is
    /// returned alongside it. Duplicate tickers are requested once.
    pub async fn fetch_batch(&self, tickers: &[String]) -> BatchFetch {
        let mut seen = HashSet::new();
        let mut pending: Vec<String> = tickers
            .iter()
            .filter(|t| seen.insert(t.as_str()))
            .cloned()
            .collect();

        let mut result = BatchFetch::default();
        if pending.is_empty() {
            return result;
        }

        if self.providers.is_empty() {
            warn!("No quote providers configured");
            result.failure = Some(MarketDataError::NoProvidersAvailable);
            return result;
        }

        let mut last_error: Option<MarketDataError> = None;
        let mut attempted = false;

        for provider in &self.providers {
            if pending.is_empty() {
                break;
            }

            let provider_id: ProviderId = Cow::Borrowed(provider.id());
            let batch_size = provider.capabilities().max_batch_size.max(1);
            let mut stop_chain = false;

            for chunk in pending.chunks(batch_size) {
                if !self.rate_limiter.try_acquire(&provider_id) {
                    debug!(
                        "Provider '{}' has no rate limit token, skipping",
                        provider_id
                    );
                    break;
                }

                attempted = true;
                info!(
                    "Fetching {} quote(s) from provider '{}'",
                    chunk.len(),
                    provider_id
                );

                match provider.get_latest_quotes(chunk).await {
                    Ok(batch) => {
                        let mut accepted = 0;
                        for quote in batch {
                            if !quote.has_data() || !chunk.contains(&quote.ticker) {
                                continue;
                            }
                            if let std::collections::hash_map::Entry::Vacant(slot) =
                                result.quotes.entry(quote.ticker.clone())
                            {
                                slot.insert(quote);
                                accepted += 1;
                            }
                        }
                        info!(
                            "Provider '{}' returned data for {}/{} ticker(s)",
                            provider_id,
                            accepted,
                            chunk.len()
                        );
                    }
                    Err(e) => match e.retry_class() {
                        RetryClass::Cooldown => {
                            warn!("Provider '{}' rate limited the request: {}", provider_id, e);
                            result.failure = Some(e);
                            return result;
                        }
                        RetryClass::Never => {
                            info!("Terminal error from '{}': {}, not retrying", provider_id, e);
                            last_error = Some(e);
                            stop_chain = true;
                            break;
                        }
                        RetryClass::NextProvider => {
                            warn!("Provider '{}' failed: {}", provider_id, e);
                            let symbol_level = matches!(e, MarketDataError::SymbolNotFound(_));
                            last_error = Some(e);
                            // An unknown symbol only spoils its own chunk.
                            if !symbol_level {
                                break;
                            }
                        }
                    },
                }
            }

            pending.retain(|t| !result.quotes.contains_key(t));
            if stop_chain {
                break;
            }
        }

        if !pending.is_empty() {
            result.failure = Some(match last_error {
                Some(e) => e,
                None if !attempted => MarketDataError::NoProvidersAvailable,
                None => MarketDataError::SymbolNotFound(pending.join(",")),
            });
        }

        result
    }
}
