//! Yahoo Finance API response models.
//!
//! Two body shapes are in use:
//! - the quote list (`/v7/finance/quote`, RapidAPI `market/v2/get-quotes`):
//!   `{"quoteResponse": {"result": [{"symbol": ..., "regularMarketPrice": 1.23}]}}`
//! - the per-symbol summary (RapidAPI `stock/v2/get-summary`):
//!   `{"price": {"regularMarketPrice": {"raw": 1.23, "fmt": "1.23"}}}`
//!
//! Every field is optional and numbers may arrive plain or wrapped in
//! `{raw, fmt}`, so both shapes share [`WireNumber`].

use chrono::{DateTime, TimeZone, Utc};
use num_traits::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::Quote;

/// A numeric field as Yahoo sends it: `1.23`, `{"raw": 1.23}`, `{}` or junk.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireNumber {
    Plain(f64),
    Wrapped { raw: Option<f64> },
    Other(serde_json::Value),
}

impl WireNumber {
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Plain(v) => Some(*v),
            Self::Wrapped { raw } => *raw,
            Self::Other(_) => None,
        }
    }
}

/// Converts a wire number to a finite decimal. NaN and infinities become `None`.
pub(crate) fn to_decimal(number: Option<&WireNumber>) -> Option<Decimal> {
    number
        .and_then(WireNumber::value)
        .filter(|v| v.is_finite())
        .and_then(Decimal::from_f64)
}

/// Market time in epoch seconds, or `fallback` when absent or out of range.
pub(crate) fn to_timestamp(number: Option<&WireNumber>, fallback: DateTime<Utc>) -> DateTime<Utc> {
    number
        .and_then(WireNumber::value)
        .filter(|v| v.is_finite())
        .and_then(|secs| Utc.timestamp_opt(secs as i64, 0).single())
        .unwrap_or(fallback)
}

/// Pairs a response symbol with the ticker we asked for.
///
/// Matching is case-insensitive. A result without a symbol can only be
/// attributed when exactly one ticker was requested.
pub(crate) fn match_requested<'a>(symbol: Option<&str>, requested: &'a [String]) -> Option<&'a String> {
    match symbol {
        Some(symbol) => requested.iter().find(|t| t.eq_ignore_ascii_case(symbol)),
        None if requested.len() == 1 => requested.first(),
        None => None,
    }
}

// ============================================================================
// Quote list shape
// ============================================================================

/// Envelope of the quote list endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteListResponse {
    #[serde(default)]
    pub quote_response: Option<QuoteList>,
}

#[derive(Debug, Default, Deserialize)]
pub struct QuoteList {
    #[serde(default)]
    pub result: Option<Vec<QuoteNode>>,
    // Note: error field exists in the API but failures are handled via HTTP status
}

/// One entry of `quoteResponse.result`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteNode {
    pub symbol: Option<String>,
    pub regular_market_price: Option<WireNumber>,
    pub regular_market_previous_close: Option<WireNumber>,
    pub regular_market_change: Option<WireNumber>,
    pub regular_market_time: Option<WireNumber>,
}

impl QuoteListResponse {
    /// Converts every attributable entry into a quote for a requested ticker.
    pub(crate) fn into_quotes(
        self,
        requested: &[String],
        source: &str,
        fetched_at: DateTime<Utc>,
    ) -> Vec<Quote> {
        self.quote_response
            .and_then(|list| list.result)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|node| {
                let ticker = match_requested(node.symbol.as_deref(), requested)?;
                Some(Quote::new(
                    ticker.clone(),
                    to_decimal(node.regular_market_price.as_ref()),
                    to_decimal(node.regular_market_previous_close.as_ref()),
                    to_decimal(node.regular_market_change.as_ref()),
                    to_timestamp(node.regular_market_time.as_ref(), fetched_at),
                    source,
                ))
            })
            .collect()
    }
}

// ============================================================================
// Summary shape
// ============================================================================

/// Body of the per-symbol summary endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct SummaryResponse {
    #[serde(default)]
    pub price: Option<SummaryPrice>,
}

/// The `price` module of a summary response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryPrice {
    pub symbol: Option<String>,
    pub regular_market_price: Option<WireNumber>,
    pub regular_market_previous_close: Option<WireNumber>,
    pub regular_market_change: Option<WireNumber>,
    pub regular_market_time: Option<WireNumber>,
}

impl SummaryResponse {
    pub(crate) fn into_quote(
        self,
        requested: &[String],
        source: &str,
        fetched_at: DateTime<Utc>,
    ) -> Option<Quote> {
        let price = self.price?;
        let ticker = match_requested(price.symbol.as_deref(), requested)?;
        Some(Quote::new(
            ticker.clone(),
            to_decimal(price.regular_market_price.as_ref()),
            to_decimal(price.regular_market_previous_close.as_ref()),
            to_decimal(price.regular_market_change.as_ref()),
            to_timestamp(price.regular_market_time.as_ref(), fetched_at),
            source,
        ))
    }
}
