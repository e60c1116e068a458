//! Yahoo Finance via RapidAPI (apidojo).
//!
//! Two endpoints of the same subscription are exposed as separate providers:
//! - `RAPIDAPI_YAHOO`: batch `market/v2/get-quotes`, one call for many symbols
//! - `RAPIDAPI_YAHOO_SUMMARY`: per-symbol `stock/v2/get-summary`, used for
//!   whatever the batch call left unanswered
//!
//! Both authenticate with the `x-rapidapi-host` / `x-rapidapi-key` headers.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, RequestBuilder};
use tracing::debug;

use crate::errors::MarketDataError;
use crate::models::Quote;
use crate::provider::http::{build_client, get_json};
use crate::provider::yahoo::models::{QuoteListResponse, SummaryResponse};
use crate::provider::{MarketDataProvider, ProviderCapabilities, RateLimit};

pub const DEFAULT_RAPIDAPI_HOST: &str = "apidojo-yahoo-finance-v1.p.rapidapi.com";
pub const DEFAULT_RAPIDAPI_BASE_URL: &str = "https://apidojo-yahoo-finance-v1.p.rapidapi.com";
pub const DEFAULT_REGION: &str = "AU";

const QUOTES_PROVIDER_ID: &str = "RAPIDAPI_YAHOO";
const SUMMARY_PROVIDER_ID: &str = "RAPIDAPI_YAHOO_SUMMARY";

/// Connection settings shared by both RapidAPI providers.
#[derive(Clone, Debug)]
pub struct RapidApiConfig {
    pub api_key: String,
    pub host: String,
    pub base_url: String,
    pub region: String,
    pub timeout: Duration,
}

impl RapidApiConfig {
    /// Production settings for `api_key`.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            host: DEFAULT_RAPIDAPI_HOST.to_string(),
            base_url: DEFAULT_RAPIDAPI_BASE_URL.to_string(),
            region: DEFAULT_REGION.to_string(),
            timeout: Duration::from_secs(6),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("x-rapidapi-host", &self.host)
            .header("x-rapidapi-key", &self.api_key)
    }
}

/// Requests per minute allowed by the Basic plan across both endpoints.
const PLAN_REQUESTS_PER_MINUTE: u32 = 30;
const PLAN_BURST_CAPACITY: u32 = 6;

/// Each endpoint gets its own bucket, so each is sized to half the plan.
fn rapidapi_rate_limit() -> RateLimit {
    RateLimit {
        requests_per_minute: PLAN_REQUESTS_PER_MINUTE / 2,
        burst_capacity: PLAN_BURST_CAPACITY / 2,
    }
}

// ============================================================================
// Batch quotes
// ============================================================================

/// Batch quote provider backed by `market/v2/get-quotes`.
pub struct RapidApiQuotesProvider {
    client: Client,
    config: RapidApiConfig,
}

impl RapidApiQuotesProvider {
    pub fn new(config: RapidApiConfig) -> Result<Self, MarketDataError> {
        Ok(Self {
            client: build_client(QUOTES_PROVIDER_ID, config.timeout)?,
            config,
        })
    }
}

#[async_trait]
impl MarketDataProvider for RapidApiQuotesProvider {
    fn id(&self) -> &'static str {
        QUOTES_PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        1
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            max_batch_size: 50,
            requires_api_key: true,
        }
    }

    fn rate_limit(&self) -> RateLimit {
        rapidapi_rate_limit()
    }

    async fn get_latest_quotes(&self, tickers: &[String]) -> Result<Vec<Quote>, MarketDataError> {
        if tickers.is_empty() {
            return Ok(Vec::new());
        }

        let symbols = tickers.join(",");
        debug!("Fetching {} quote(s) from RapidAPI: {}", tickers.len(), symbols);

        let request = self.config.authorize(
            self.client
                .get(self.config.endpoint("market/v2/get-quotes"))
                .query(&[
                    ("region", self.config.region.as_str()),
                    ("symbols", symbols.as_str()),
                ]),
        );

        let response: QuoteListResponse = get_json(QUOTES_PROVIDER_ID, &symbols, request).await?;
        Ok(response.into_quotes(tickers, QUOTES_PROVIDER_ID, Utc::now()))
    }
}

// ============================================================================
// Per-symbol summary
// ============================================================================

/// Per-symbol provider backed by `stock/v2/get-summary`.
pub struct RapidApiSummaryProvider {
    client: Client,
    config: RapidApiConfig,
}

impl RapidApiSummaryProvider {
    pub fn new(config: RapidApiConfig) -> Result<Self, MarketDataError> {
        Ok(Self {
            client: build_client(SUMMARY_PROVIDER_ID, config.timeout)?,
            config,
        })
    }

    async fn fetch_summary(&self, ticker: &String) -> Result<Option<Quote>, MarketDataError> {
        debug!("Fetching summary for {} from RapidAPI", ticker);

        let request = self.config.authorize(
            self.client
                .get(self.config.endpoint("stock/v2/get-summary"))
                .query(&[
                    ("symbol", ticker.as_str()),
                    ("region", self.config.region.as_str()),
                ]),
        );

        let response: SummaryResponse = get_json(SUMMARY_PROVIDER_ID, ticker, request).await?;
        Ok(response.into_quote(std::slice::from_ref(ticker), SUMMARY_PROVIDER_ID, Utc::now()))
    }
}

#[async_trait]
impl MarketDataProvider for RapidApiSummaryProvider {
    fn id(&self) -> &'static str {
        SUMMARY_PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        2
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            max_batch_size: 1,
            requires_api_key: true,
        }
    }

    fn rate_limit(&self) -> RateLimit {
        rapidapi_rate_limit()
    }

    async fn get_latest_quotes(&self, tickers: &[String]) -> Result<Vec<Quote>, MarketDataError> {
        let mut quotes = Vec::with_capacity(tickers.len());
        for ticker in tickers {
            if let Some(quote) = self.fetch_summary(ticker).await? {
                quotes.push(quote);
            }
        }
        Ok(quotes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let mut config = RapidApiConfig::new("key");
        config.base_url = "http://localhost:8000/".to_string();
        assert_eq!(
            config.endpoint("market/v2/get-quotes"),
            "http://localhost:8000/market/v2/get-quotes"
        );
    }

    #[test]
    fn test_defaults_target_asx() {
        let config = RapidApiConfig::new("key");
        assert_eq!(config.region, "AU");
        assert_eq!(config.host, DEFAULT_RAPIDAPI_HOST);
        assert_eq!(config.timeout, Duration::from_secs(6));
    }

    #[test]
    fn test_priorities_order_batch_before_summary() {
        let quotes = RapidApiQuotesProvider::new(RapidApiConfig::new("key")).unwrap();
        let summary = RapidApiSummaryProvider::new(RapidApiConfig::new("key")).unwrap();
        assert!(quotes.priority() < summary.priority());
        assert_eq!(summary.capabilities().max_batch_size, 1);
        assert!(quotes.capabilities().requires_api_key);
    }

    #[test]
    fn test_endpoints_together_stay_within_plan() {
        let quotes = RapidApiQuotesProvider::new(RapidApiConfig::new("key")).unwrap();
        let summary = RapidApiSummaryProvider::new(RapidApiConfig::new("key")).unwrap();
        let (a, b) = (quotes.rate_limit(), summary.rate_limit());

        assert!(a.requests_per_minute + b.requests_per_minute <= PLAN_REQUESTS_PER_MINUTE);
        assert!(a.burst_capacity + b.burst_capacity <= PLAN_BURST_CAPACITY);
        assert!(a.requests_per_minute > 0 && b.requests_per_minute > 0);
    }
}
