//! Market data provider trait definitions.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::Quote;

use super::capabilities::{ProviderCapabilities, RateLimit};

/// Trait for latest-quote providers.
///
/// Implement this trait to add a new quote source. The registry uses the
/// provider's priority to order the fallback chain and its capabilities to
/// decide how many tickers to put in one request.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "RAPIDAPI_YAHOO" or "YAHOO_PUBLIC".
    /// Used for logging, rate limiting and the stored quote's source column.
    fn id(&self) -> &'static str;

    /// Provider priority for ordering. Lower values = higher priority.
    fn priority(&self) -> u8 {
        10
    }

    /// Describes how this provider can be called.
    fn capabilities(&self) -> ProviderCapabilities;

    /// Rate limiting configuration for this provider.
    fn rate_limit(&self) -> RateLimit {
        RateLimit::default()
    }

    /// Fetch the latest quotes for `tickers` in one request.
    ///
    /// `tickers` never holds more than `capabilities().max_batch_size`
    /// entries. The returned quotes carry the *requested* ticker spelling.
    /// Tickers the provider knows nothing about are simply omitted; an
    /// entry with every field `None` is allowed and treated as a miss.
    async fn get_latest_quotes(&self, tickers: &[String]) -> Result<Vec<Quote>, MarketDataError>;
}
