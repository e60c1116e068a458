//! Yahoo Finance public quote provider.
//!
//! Calls the unauthenticated `/v7/finance/quote` endpoint with a
//! comma-separated symbol list. It is the last link of the default chain:
//! no key is needed, but Yahoo throttles it aggressively.

pub(crate) mod models;

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use tracing::debug;

use crate::errors::MarketDataError;
use crate::models::Quote;
use crate::provider::http::{build_client, get_json};
use crate::provider::{MarketDataProvider, ProviderCapabilities, RateLimit};

use models::QuoteListResponse;

/// Production endpoint of the public API.
pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";

const PROVIDER_ID: &str = "YAHOO_PUBLIC";

/// Yahoo Finance public provider.
pub struct YahooPublicProvider {
    client: Client,
    base_url: String,
}

impl YahooPublicProvider {
    /// Create a provider against `base_url` with a fixed per-call timeout.
    ///
    /// Fails when the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, MarketDataError> {
        Ok(Self {
            client: build_client(PROVIDER_ID, timeout)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl MarketDataProvider for YahooPublicProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        3
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            max_batch_size: 50,
            requires_api_key: false,
        }
    }

    fn rate_limit(&self) -> RateLimit {
        RateLimit {
            requests_per_minute: 120,
            burst_capacity: 10,
        }
    }

    async fn get_latest_quotes(&self, tickers: &[String]) -> Result<Vec<Quote>, MarketDataError> {
        if tickers.is_empty() {
            return Ok(Vec::new());
        }

        let symbols = tickers.join(",");
        debug!("Fetching {} quote(s) from Yahoo: {}", tickers.len(), symbols);

        let request = self
            .client
            .get(format!("{}/v7/finance/quote", self.base_url))
            .query(&[("symbols", symbols.as_str())]);

        let response: QuoteListResponse = get_json(PROVIDER_ID, &symbols, request).await?;
        Ok(response.into_quotes(tickers, PROVIDER_ID, Utc::now()))
    }
}
